/// Column labels of the output file, in the order `Record::fields` yields them.
pub const FIELD_LABELS: [&str; 7] = [
    "Goodreads ID",
    "Book Title",
    "Date Started",
    "Date Read",
    "Author",
    "Average Rating",
    "Number of Pages",
];

/// One reviewed book. Every field is plain text; anything missing in the markup is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub goodreads_id: String,
    pub title: String,
    /// `YYYY-MM-DD` when the site's date could be read, otherwise the raw text.
    pub date_started: String,
    pub date_read: String,
    pub author: String,
    pub avg_rating: String,
    pub num_pages: String,
}

impl Record {
    pub fn fields(&self) -> [&str; 7] {
        [
            self.goodreads_id.as_str(),
            self.title.as_str(),
            self.date_started.as_str(),
            self.date_read.as_str(),
            self.author.as_str(),
            self.avg_rating.as_str(),
            self.num_pages.as_str(),
        ]
    }

    #[inline]
    pub fn has_date_read(&self) -> bool {
        !self.date_read.trim().is_empty()
    }
}
