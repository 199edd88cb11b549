// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DeliveryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanType {
    GoldLoan,
    HomeLoan,
    EducationLoan,
}

impl LoanType {
    /// Fixed report order.
    pub const ALL: [LoanType; 3] = [
        LoanType::GoldLoan,
        LoanType::HomeLoan,
        LoanType::EducationLoan,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LoanType::GoldLoan => "Gold Loan",
            LoanType::HomeLoan => "Home Loan",
            LoanType::EducationLoan => "Education Loan",
        }
    }

    pub fn paid_column(&self) -> String {
        format!("{} Paid", self.label())
    }

    pub fn remaining_column(&self) -> String {
        format!("{} Remaining", self.label())
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Transaction kind as found in the `Type` column. Anything other than the
/// exact strings `Debit` and `Credit` is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxnType {
    Debit,
    Credit,
    Other(String),
}

impl TxnType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Debit" => TxnType::Debit,
            "Credit" => TxnType::Credit,
            other => TxnType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TxnType::Debit => "Debit",
            TxnType::Credit => "Credit",
            TxnType::Other(s) => s,
        }
    }
}

impl fmt::Display for TxnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanBalance {
    pub paid: Decimal,
    pub remaining: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub employee_id: String,
    pub employee_name: String,
    pub transaction_id: String,
    pub date: String, // shown as-is
    pub amount: Decimal,
    pub r#type: TxnType,
    pub description: String,
    pub branch: String,
    pub loans: [LoanBalance; 3], // indexed like LoanType::ALL
}

impl TransactionRow {
    pub fn loan(&self, loan: LoanType) -> LoanBalance {
        self.loans[loan_index(loan)]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeAggregate {
    pub employee_id: String,
    pub employee_name: String,
    pub branch: String,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub loan_summary: Vec<(LoanType, LoanBalance)>,
    pub transactions: Vec<TransactionRow>,
}

impl EmployeeAggregate {
    pub fn loan(&self, loan: LoanType) -> LoanBalance {
        self.loan_summary
            .iter()
            .find(|(t, _)| *t == loan)
            .map(|(_, b)| *b)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub employee_id: String,
    pub employee_name: String,
    pub branch: String,
    pub as_of: NaiveDate,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Outcome of one send; reported once, never retried.
#[derive(Debug)]
pub struct DeliveryAttempt {
    pub employee_id: String,
    pub employee_name: String,
    pub recipient: String,
    pub outcome: Result<(), DeliveryError>,
}

impl DeliveryAttempt {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

pub(crate) fn loan_index(loan: LoanType) -> usize {
    match loan {
        LoanType::GoldLoan => 0,
        LoanType::HomeLoan => 1,
        LoanType::EducationLoan => 2,
    }
}
