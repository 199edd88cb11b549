// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Table header lacks one or more required columns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("CSV missing required columns: {}", .missing_columns.join(", "))]
pub struct SchemaError {
    pub missing_columns: Vec<String>,
}

/// A numeric column held something that is not a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid number '{value}' in column '{column}' at row {row}")]
pub struct DataError {
    pub column: String,
    pub row: usize,
    pub value: String,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("could not build message: {0}")]
    Message(String),

    #[error("transport failure: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("branch directory has no 'Default' entry")]
    MissingDefaultBranch,

    #[error("could not determine platform-specific config dir")]
    NoConfigDir,
}

/// Everything that can abort a generate run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Error reading CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
