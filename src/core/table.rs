//! Shared helpers for frame-keyed CSV tables.

use serde::de::DeserializeOwned;
use std::io::Read;

use crate::util::{Error, Result};

/// Frame number as recorded by the simulator.
pub type Frame = u64;

/// Rows carrying a frame key.
pub trait Keyed {
    fn frame(&self) -> Frame;
}

/// Deserialize every row of a CSV member.
///
/// An empty member (no header line) yields no rows. A non-empty member must
/// carry every column in `required`.
pub(crate) fn read_csv_rows<T, R>(member: &str, reader: R, required: &[&str]) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv.headers().map_err(|e| Error::table(member, e))?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    if let Some(col) = required.iter().find(|c| !headers.iter().any(|h| h == **c)) {
        return Err(Error::table(member, format!("missing column `{col}`")));
    }

    csv.deserialize()
        .map(|row| row.map_err(|e| Error::table(member, e)))
        .collect()
}

/// Sort rows by frame and reject duplicate keys.
pub(crate) fn sort_unique<T: Keyed>(member: &str, rows: &mut [T]) -> Result<()> {
    rows.sort_by_key(|r| r.frame());
    if let Some(pair) = rows.windows(2).find(|w| w[0].frame() == w[1].frame()) {
        return Err(Error::DuplicateFrame { member: member.to_string(), frame: pair[0].frame() });
    }
    Ok(())
}

/// Index of `frame` in a sorted, duplicate-free slice.
#[inline]
pub(crate) fn position<T: Keyed>(rows: &[T], frame: Frame) -> Option<usize> {
    rows.binary_search_by_key(&frame, |r| r.frame()).ok()
}

/// Index of the last row with key <= `frame`, if any.
#[inline]
pub(crate) fn floor_position<T: Keyed>(rows: &[T], frame: Frame) -> Option<usize> {
    rows.partition_point(|r| r.frame() <= frame).checked_sub(1)
}

/// Index of the first row with key > `frame`, if any.
#[inline]
pub(crate) fn next_position<T: Keyed>(rows: &[T], frame: Frame) -> Option<usize> {
    let idx = rows.partition_point(|r| r.frame() <= frame);
    (idx < rows.len()).then_some(idx)
}

/// Parse boolean cells written as `true`, `True`, `TRUE` or `1` (and their negatives).
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "true" | "True" | "TRUE" | "1" | "1.0" => Ok(true),
        "false" | "False" | "FALSE" | "0" | "0.0" => Ok(false),
        other => Err(serde::de::Error::custom(format!("invalid boolean `{other}`"))),
    }
}

/// Treat empty cells as absent.
pub(crate) fn deserialize_name<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty() && s != "nan" && s != "NaN"))
}
