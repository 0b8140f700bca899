//! Goodreads review list → TSV exporter.
//!
//! Fetches a user's `review/list` pages one at a time, pulls the book rows out of the
//! markup and appends them to a tab separated file.

mod macros;

pub mod cli;
pub mod cookies;
mod error;
pub mod output;
pub mod parse;
pub mod process;
pub mod record;
pub mod request;

pub use error::{Error, Result};

pub const BASE_URL: &str = "https://www.goodreads.com";
/// Rows per listing page. The site caps this at 100.
pub const PER_PAGE: usize = 100;
pub const DEFAULT_OUTPUT: &str = "books.tsv";
/// Looked up in the working directory.
pub const COOKIE_FILE: &str = "cookies.json";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const PAGE_DELAY_MS: u64 = 1000;
