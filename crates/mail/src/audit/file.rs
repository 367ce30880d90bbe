//! Delimited text file audit sink
//!
//! Writes a header row followed by one row per record. Every field is
//! double-quoted with embedded quotes doubled, so the delimiter may appear
//! inside subjects. The file is created exclusively on the first record and
//! flushed after every row.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use super::{AuditError, AuditSink};
use crate::models::{RECORD_COLUMNS, TransferRecord};

/// Field delimiter used when none is configured
pub const DEFAULT_DELIMITER: char = ';';

/// Audit sink backed by a delimited text file
pub struct DelimitedFileSink {
    path: PathBuf,
    delimiter: char,
    writer: Option<BufWriter<File>>,
}

impl DelimitedFileSink {
    pub fn new(path: impl Into<PathBuf>, delimiter: char) -> Self {
        Self {
            path: path.into(),
            delimiter,
            writer: None,
        }
    }

    fn io_error(&self, source: std::io::Error) -> AuditError {
        AuditError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn open(&self) -> Result<BufWriter<File>, AuditError> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => AuditError::AlreadyExists {
                    path: self.path.display().to_string(),
                },
                _ => self.io_error(e),
            })?;

        let mut writer = BufWriter::new(file);
        let header = self.format_row(RECORD_COLUMNS.iter().copied());
        writer
            .write_all(header.as_bytes())
            .map_err(|e| self.io_error(e))?;
        Ok(writer)
    }

    fn format_row<'a>(&self, fields: impl Iterator<Item = &'a str>) -> String {
        let delimiter = self.delimiter.to_string();
        let mut row = fields
            .map(quote_field)
            .collect::<Vec<_>>()
            .join(&delimiter);
        row.push('\n');
        row
    }
}

fn quote_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

impl AuditSink for DelimitedFileSink {
    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn append(&mut self, record: &TransferRecord) -> Result<(), AuditError> {
        if self.writer.is_none() {
            self.writer = Some(self.open()?);
        }

        let fields = record.fields();
        let row = self.format_row(fields.iter().map(String::as_str));

        let result = match self.writer.as_mut() {
            Some(writer) => writer.write_all(row.as_bytes()).and_then(|_| writer.flush()),
            None => Ok(()),
        };
        result.map_err(|e| self.io_error(e))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
