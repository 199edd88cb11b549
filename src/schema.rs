// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::SchemaError;
use crate::models::LoanType;
use crate::table::Table;
use std::collections::HashSet;

pub const REQUIRED_COLUMNS: [&str; 8] = [
    "EmployeeID",
    "EmployeeName",
    "TransactionID",
    "Date",
    "Amount",
    "Type",
    "Description",
    "Branch",
];

/// `<LoanType> Paid` then `<LoanType> Remaining`, per loan type.
pub fn loan_columns() -> Vec<String> {
    LoanType::ALL
        .iter()
        .flat_map(|l| [l.paid_column(), l.remaining_column()])
        .collect()
}

/// A table whose header carries every required column.
#[derive(Debug, Clone)]
pub struct ValidatedTable<T> {
    inner: T,
}

impl<T: Table> ValidatedTable<T> {
    pub fn table(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

pub fn missing_columns<T: Table>(table: &T) -> Vec<String> {
    let present: HashSet<&str> = table.columns().into_iter().collect();
    REQUIRED_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(loan_columns())
        .filter(|c| !present.contains(c.as_str()))
        .collect()
}

pub fn validate<T: Table>(table: T) -> Result<ValidatedTable<T>, SchemaError> {
    let missing = missing_columns(&table);
    if !missing.is_empty() {
        return Err(SchemaError {
            missing_columns: missing,
        });
    }
    Ok(ValidatedTable { inner: table })
}
