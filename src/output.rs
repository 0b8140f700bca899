use std::borrow::Cow;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::record::{Record, FIELD_LABELS};
use crate::Result;

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Tab separated sink. The header row goes out on creation.
pub struct TsvWriter<W> {
    out: W,
    rows: usize,
}

impl TsvWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path`.
    pub async fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).await?;
        TsvWriter::new(BufWriter::new(file)).await
    }
}

impl<W: AsyncWrite + Unpin> TsvWriter<W> {
    pub async fn new(out: W) -> Result<Self> {
        let mut writer = Self { out, rows: 0 };
        writer.write_line(&FIELD_LABELS).await?;
        Ok(writer)
    }

    pub async fn write_record(&mut self, record: &Record) -> Result<()> {
        self.write_line(&record.fields()).await?;
        self.rows += 1;
        Ok(())
    }

    /// Data rows written so far, header excluded.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes and hands back the underlying writer.
    pub async fn finish(mut self) -> Result<W> {
        self.out.flush().await?;
        Ok(self.out)
    }

    async fn write_line(&mut self, fields: &[&str]) -> Result<()> {
        let line = fields
            .iter()
            .map(|f| escape_field(f))
            .collect::<Vec<_>>()
            .join("\t");
        self.out.write_all(line.as_bytes()).await?;
        self.out.write_all(LINE_ENDING.as_bytes()).await?;
        Ok(())
    }
}

/// Quotes a field that would otherwise break the row apart.
/// Inner quotes are doubled.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(['\t', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
