use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tokio::task::spawn_blocking;

use crate::record::Record;
use crate::{Error, Result};

const SITE_DATE_FORMAT: &str = "%b %d, %Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// What one listing page yielded.
#[derive(Debug, Default)]
pub struct ReviewPage {
    /// Only looked up when asked for, see `parse_page`.
    pub total_pages: Option<u32>,
    pub records: Vec<Record>,
}

/// Parses a listing page off the async runtime.
/// With `with_pagination` set the pagination bound is read as well; it is only meaningful
/// on the first page.
pub async fn parse_page(html: String, with_pagination: bool) -> Result<ReviewPage> {
    let page = spawn_blocking(move || -> Result<ReviewPage> {
        let doc = Html::parse_document(&html);
        let selectors = ReviewSelectors::new()?;

        let total_pages = if with_pagination {
            selectors.total_pages(&doc)
        } else {
            None
        };
        let records = selectors.records(&doc);

        Ok(ReviewPage {
            total_pages,
            records,
        })
    })
    .await??;

    Ok(page)
}

/// Every selector the listing markup is read with.
pub struct ReviewSelectors {
    pagination: Selector,
    link: Selector,
    row: Selector,
    tooltip: Selector,
    title_cell: Selector,
    date_started_cell: Selector,
    date_started_value: Selector,
    date_read_cell: Selector,
    date_read_value: Selector,
    author_cell: Selector,
    avg_rating_cell: Selector,
    num_pages_cell: Selector,
    nobr: Selector,
}

impl ReviewSelectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pagination: create_selector("div#reviewPagination")?,
            link: create_selector("a")?,
            row: create_selector("tr.bookalike.review")?,
            tooltip: create_selector("div.js-tooltipTrigger")?,
            title_cell: create_selector("td.field.title")?,
            date_started_cell: create_selector("td.field.date_started")?,
            date_started_value: create_selector("span.date_started_value")?,
            date_read_cell: create_selector("td.field.date_read")?,
            date_read_value: create_selector("span.date_read_value")?,
            author_cell: create_selector("td.field.author")?,
            avg_rating_cell: create_selector("td.field.avg_rating")?,
            num_pages_cell: create_selector("td.field.num_pages")?,
            nobr: create_selector("nobr")?,
        })
    }

    /// Reads the page count off the pagination control.
    /// The last link there is "next", so the highest page number is the one before it.
    /// `None` when the control is missing or doesn't hold a number in that spot.
    pub fn total_pages(&self, doc: &Html) -> Option<u32> {
        let pagination = doc.select(&self.pagination).next()?;
        let links: Vec<ElementRef> = pagination.select(&self.link).collect();
        let label = links.len().checked_sub(2).map(|i| text_of(links[i]))?;

        label.parse::<u32>().ok().filter(|n| *n > 0)
    }

    /// One record per review row, in document order.
    pub fn records(&self, doc: &Html) -> Vec<Record> {
        // The listing is requested with `PER_PAGE` rows.
        let mut records = Vec::with_capacity(crate::PER_PAGE);
        for row in doc.select(&self.row) {
            records.push(self.record(row));
        }
        records
    }

    pub fn record(&self, row: ElementRef) -> Record {
        let goodreads_id = first(row, &self.tooltip)
            .and_then(|div| div.value().attr("data-resource-id"))
            .unwrap_or_default()
            .to_string();

        let title = self.nested_text(row, &self.title_cell, &self.link);
        let date_started =
            convert_date(&self.nested_text(row, &self.date_started_cell, &self.date_started_value));
        let date_read =
            convert_date(&self.nested_text(row, &self.date_read_cell, &self.date_read_value));
        let author = self.nested_text(row, &self.author_cell, &self.link);
        let avg_rating = first(row, &self.avg_rating_cell)
            .map(text_of)
            .unwrap_or_default();
        let num_pages = self
            .nested_text(row, &self.num_pages_cell, &self.nobr)
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();

        Record {
            goodreads_id,
            title,
            date_started,
            date_read,
            author,
            avg_rating,
            num_pages,
        }
    }

    /// Trimmed text of the first `inner` inside the first `cell` of the row, or empty.
    fn nested_text(&self, row: ElementRef, cell: &Selector, inner: &Selector) -> String {
        first(row, cell)
            .and_then(|cell| first(cell, inner))
            .map(text_of)
            .unwrap_or_default()
    }
}

/// Turns the site's `Jan 5, 2023` into `2023-01-05`.
/// Anything that doesn't fit that shape comes back untouched.
pub fn convert_date(raw: &str) -> String {
    // Month, day and year need whitespace between them; chrono takes `Jan5, 2023` otherwise.
    if raw.split_whitespace().count() != 3 {
        return raw.to_string();
    }
    let has_full_year = raw
        .rsplit(' ')
        .next()
        .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()));
    if !has_full_year {
        return raw.to_string();
    }

    match NaiveDate::parse_from_str(raw, SITE_DATE_FORMAT) {
        Ok(date) => date.format(ISO_DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

#[inline]
fn first<'a>(el: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    el.select(sel).next()
}

#[inline]
fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}
