//! Result table assembly and delimited export

use crate::types::Keyword;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;

/// Header of the exported table
pub const EXPORT_HEADER: [&str; 2] = ["keyword", "extracted_word"];

/// Field separator of the exported table
pub const EXPORT_DELIMITER: u8 = b';';

/// One surviving (keyword, phrase) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Index of the query that produced the row
    pub query_index: usize,
    /// Source keyword
    pub keyword: Keyword,
    /// Extracted phrase
    pub phrase: String,
}

/// Append-only table of result rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the filtered tokens of one query, in order
    pub fn append(&mut self, query_index: usize, keyword: &Keyword, phrases: Vec<String>) {
        self.rows.extend(phrases.into_iter().map(|phrase| ResultRow {
            query_index,
            keyword: keyword.clone(),
            phrase,
        }));
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Iterate `(keyword, phrase)` pairs
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rows
            .iter()
            .map(|row| (row.keyword.as_str(), row.phrase.as_str()))
    }

    /// Stable sort by originating query index
    pub fn sort_by_query(&mut self) {
        self.rows.sort_by_key(|row| row.query_index);
    }

    /// Copy without repeated (keyword, phrase) pairs, first occurrence wins
    pub fn deduplicated(&self) -> Self {
        let mut seen = HashSet::new();
        let rows = self
            .rows
            .iter()
            .filter(|row| seen.insert((row.keyword.clone(), row.phrase.clone())))
            .cloned()
            .collect();
        Self { rows }
    }

    /// Write the table as `;`-delimited UTF-8 text with a header row
    pub fn write_delimited<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::WriterBuilder::new()
            .delimiter(EXPORT_DELIMITER)
            .from_writer(writer);

        csv.write_record(EXPORT_HEADER)?;
        for row in &self.rows {
            csv.write_record([row.keyword.as_str(), row.phrase.as_str()])?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Delimited export as a string
    pub fn to_delimited_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_delimited(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl IntoIterator for ResultTable {
    type Item = ResultRow;
    type IntoIter = std::vec::IntoIter<ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
