//! Custom record tables (`custom/<name>.csv`).
//!
//! These are written by user code during a session and carry no schema the
//! reader knows about; cells are kept as raw strings.

use std::io::Read;

use crate::util::{Error, Result};

/// Opaque named table.
#[derive(Clone, Debug, Default)]
pub struct CustomRecordTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CustomRecordTable {
    /// Read a CSV member verbatim.
    pub fn from_csv<R: Read>(name: impl Into<String>, member: &str, reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = csv
            .headers()
            .map_err(|e| Error::table(member, e))?
            .iter()
            .map(str::to_string)
            .collect();
        let rows = csv
            .records()
            .map(|r| {
                r.map(|rec| rec.iter().map(str::to_string).collect())
                    .map_err(|e| Error::table(member, e))
            })
            .collect::<Result<_>>()?;
        Ok(Self { name: name.into(), headers, rows })
    }

    /// Record name (file stem under `custom/`).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names.
    #[inline]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Raw rows.
    #[inline]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one column; `None` if the column does not exist.
    ///
    /// Short rows yield empty strings.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &str> + '_> {
        let idx = self.headers.iter().position(|h| h == name)?;
        Some(self.rows.iter().map(move |row| row.get(idx).map_or("", String::as_str)))
    }
}
