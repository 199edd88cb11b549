// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::DataError;
use crate::models::{EmployeeAggregate, LoanBalance, LoanType, TransactionRow, TxnType};
use crate::schema::ValidatedTable;
use crate::table::Table;
use rust_decimal::Decimal;
use std::collections::{HashMap, hash_map::Entry};

fn text<T: Table>(table: &T, row: usize, column: &str) -> String {
    table.cell(row, column).unwrap_or("").to_string()
}

/// Empty cells count as zero; anything else must parse.
fn number<T: Table>(table: &T, row: usize, column: &str) -> Result<Decimal, DataError> {
    let raw = table.cell(row, column).unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    raw.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| DataError {
            column: column.to_string(),
            row: row + 1,
            value: raw.to_string(),
        })
}

/// Adds one cell into a running sum; overflow is reported against that cell.
fn accumulate<T: Table>(
    sum: &mut Decimal,
    add: Decimal,
    table: &T,
    row: usize,
    column: &str,
) -> Result<(), DataError> {
    *sum = sum.checked_add(add).ok_or_else(|| DataError {
        column: column.to_string(),
        row: row + 1,
        value: table.cell(row, column).unwrap_or("").trim().to_string(),
    })?;
    Ok(())
}

pub fn read_row<T: Table>(table: &T, row: usize) -> Result<TransactionRow, DataError> {
    let mut loans = [LoanBalance::default(); 3];
    for (slot, loan) in loans.iter_mut().zip(LoanType::ALL) {
        slot.paid = number(table, row, &loan.paid_column())?;
        slot.remaining = number(table, row, &loan.remaining_column())?;
    }
    Ok(TransactionRow {
        employee_id: text(table, row, "EmployeeID"),
        employee_name: text(table, row, "EmployeeName"),
        transaction_id: text(table, row, "TransactionID"),
        date: text(table, row, "Date"),
        amount: number(table, row, "Amount")?,
        r#type: TxnType::parse(&text(table, row, "Type")),
        description: text(table, row, "Description"),
        branch: text(table, row, "Branch"),
        loans,
    })
}

/// Groups rows per employee in first-appearance order. Rows whose `Type` is
/// neither `Debit` nor `Credit` are kept in the history but count toward
/// neither total.
pub fn aggregate<T: Table>(
    table: &ValidatedTable<T>,
) -> Result<Vec<EmployeeAggregate>, DataError> {
    let table = table.table();
    let mut out: Vec<EmployeeAggregate> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for i in 0..table.row_count() {
        let row = read_row(table, i)?;
        let slot = match slots.entry(row.employee_id.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                out.push(EmployeeAggregate {
                    employee_id: row.employee_id.clone(),
                    employee_name: row.employee_name.clone(),
                    branch: row.branch.clone(),
                    total_debit: Decimal::ZERO,
                    total_credit: Decimal::ZERO,
                    loan_summary: LoanType::ALL
                        .iter()
                        .map(|l| (*l, LoanBalance::default()))
                        .collect(),
                    transactions: Vec::new(),
                });
                *entry.insert(out.len() - 1)
            }
        };
        let agg = &mut out[slot];
        match row.r#type {
            TxnType::Debit => accumulate(&mut agg.total_debit, row.amount, table, i, "Amount")?,
            TxnType::Credit => accumulate(&mut agg.total_credit, row.amount, table, i, "Amount")?,
            TxnType::Other(ref t) => {
                log::debug!("row {} has type '{}', excluded from totals", i + 1, t)
            }
        }
        for (loan, balance) in agg.loan_summary.iter_mut() {
            let add = row.loan(*loan);
            accumulate(&mut balance.paid, add.paid, table, i, &loan.paid_column())?;
            accumulate(&mut balance.remaining, add.remaining, table, i, &loan.remaining_column())?;
        }
        agg.transactions.push(row);
    }
    log::info!("aggregated {} employees", out.len());
    Ok(out)
}
