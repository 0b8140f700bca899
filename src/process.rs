use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use tokio::io::AsyncWrite;

use crate::cookies::load_cookies;
use crate::output::TsvWriter;
use crate::parse::parse_page;
use crate::request::PageFetcher;
use crate::{
    info_time, Result, BASE_URL, COOKIE_FILE, DEFAULT_OUTPUT, PAGE_DELAY_MS, REQUEST_TIMEOUT_SECS,
};

/// Everything one export run needs.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub user_id: String,
    pub output: PathBuf,
    pub cookie_file: PathBuf,
    pub base_url: String,
    pub page_delay: Duration,
    pub timeout: Duration,
}

impl ExportConfig {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            cookie_file: PathBuf::from(COOKIE_FILE),
            base_url: BASE_URL.to_string(),
            page_delay: Duration::from_millis(PAGE_DELAY_MS),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages: u32,
    pub records: usize,
    /// At least one record had a non-empty Date Read.
    pub has_date_read: bool,
}

impl ExportSummary {
    /// The Date Read column came out empty everywhere, usually because it's hidden on the site.
    pub fn needs_date_read_advisory(&self) -> bool {
        !self.has_date_read
    }
}

pub const DATE_READ_ADVISORY: &str = "\
WARNING: The 'Date Read' column appears to be empty for all books.
Please ensure the 'Date Read' column is visible in your Goodreads library view.
To do this:
  1. Go to your Goodreads library
  2. Click 'edit' at the top of the columns
  3. Make sure 'Date Read' is checked/visible
  4. Re-run this program after making the column visible";

/// Downloads every page of the review list and writes the rows to `config.output`.
/// The first failed fetch ends the run.
pub async fn export_reviews(config: &ExportConfig) -> Result<ExportSummary> {
    let start_time = Local::now();

    let cookies = load_cookies(&config.cookie_file);
    let fetcher = PageFetcher::new(
        &config.base_url,
        &config.user_id,
        cookies.as_deref(),
        config.timeout,
    )?;
    let mut writer = TsvWriter::create(&config.output).await?;

    // Whatever made it into the file before a failure is kept.
    let written = write_pages(&fetcher, &mut writer, config.page_delay).await;
    let records = writer.rows();
    writer.finish().await?;
    let (pages, has_date_read) = written?;

    info_time!(
        start_time,
        "Wrote {} books to {}",
        records,
        config.output.display()
    );

    Ok(ExportSummary {
        pages,
        records,
        has_date_read,
    })
}

/// The page loop. Returns the page count and whether any Date Read was filled in.
async fn write_pages<W: AsyncWrite + Unpin>(
    fetcher: &PageFetcher,
    writer: &mut TsvWriter<W>,
    page_delay: Duration,
) -> Result<(u32, bool)> {
    // The first page is fetched up front for the pagination bound and reused for its rows.
    let first_html = fetcher.fetch_page(1).await?;
    let mut page = parse_page(first_html, true).await?;
    let total_pages = match page.total_pages {
        Some(total) => total,
        None => {
            println!("Could not determine total pages. Processing first page only.");
            1
        }
    };

    let mut has_date_read = false;
    for page_num in 1..=total_pages {
        info_time!("Processing page {} of {}...", page_num, total_pages);
        if page_num > 1 {
            tokio::time::sleep(page_delay).await;
            let html = fetcher.fetch_page(page_num).await?;
            page = parse_page(html, false).await?;
        }

        for record in &page.records {
            has_date_read |= record.has_date_read();
            writer.write_record(record).await?;
        }
    }

    Ok((total_pages, has_date_read))
}
