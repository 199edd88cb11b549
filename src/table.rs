// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Read-only view of tabular data: named columns, rows addressed by index.
pub trait Table {
    fn columns(&self) -> Vec<&str>;
    fn row_count(&self) -> usize;
    /// `None` when the column does not exist or the row is out of range.
    fn cell(&self, row: usize, column: &str) -> Option<&str>;
}

/// A CSV loaded fully into memory. Header names are trimmed.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    records: Vec<StringRecord>,
}

impl CsvTable {
    pub fn from_reader<R: Read>(input: R) -> Result<Self, csv::Error> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(input);
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let mut index = HashMap::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            // first occurrence wins on duplicated headers
            index.entry(h.clone()).or_insert(i);
        }
        let records = rdr.records().collect::<Result<Vec<_>, _>>()?;
        log::debug!("loaded {} rows with {} columns", records.len(), headers.len());
        Ok(Self {
            headers,
            index,
            records,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, csv::Error> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }
}

impl Table for CsvTable {
    fn columns(&self) -> Vec<&str> {
        self.headers.iter().map(String::as_str).collect()
    }

    fn row_count(&self) -> usize {
        self.records.len()
    }

    fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = *self.index.get(column)?;
        self.records.get(row)?.get(col)
    }
}
