use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::process::ExportConfig;
use crate::{BASE_URL, DEFAULT_OUTPUT, PAGE_DELAY_MS};

#[derive(Debug, Parser)]
#[command(
    name = "goodreads-tsv",
    version,
    about = "Parse Goodreads data and export to TSV",
    after_help = "Examples:\n  goodreads-tsv 38810427-giovanni\n  goodreads-tsv 38810427-giovanni --output=my_books.tsv\n\n\
                  A cookies.json in the working directory is sent along for private profiles."
)]
pub struct Cli {
    /// Goodreads user ID (e.g., 38810427-giovanni)
    pub user_id: String,

    /// Output TSV file name
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    #[arg(long, hide = true, default_value = BASE_URL)]
    pub base_url: String,

    /// Pause between page requests.
    #[arg(long, hide = true, default_value_t = PAGE_DELAY_MS)]
    pub page_delay_ms: u64,
}

impl Cli {
    pub fn into_config(self) -> ExportConfig {
        ExportConfig {
            output: self.output,
            base_url: self.base_url,
            page_delay: Duration::from_millis(self.page_delay_ms),
            ..ExportConfig::new(self.user_id)
        }
    }
}
