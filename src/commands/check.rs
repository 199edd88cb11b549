// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

use super::read_input;
use crate::aggregate::aggregate;
use crate::schema::validate;
use crate::utils::{maybe_print_json, pretty_table};

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeSummary {
    pub employee_id: String,
    pub employee_name: String,
    pub branch: String,
    pub rows: usize,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
}

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let data = summaries(m)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|s| {
                vec![
                    s.employee_id.clone(),
                    s.employee_name.clone(),
                    s.branch.clone(),
                    s.rows.to_string(),
                    s.total_debit.to_string(),
                    s.total_credit.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Employee", "Name", "Branch", "Rows", "Debits", "Credits"],
                rows
            )
        );
    }
    Ok(())
}

pub fn summaries(m: &clap::ArgMatches) -> Result<Vec<EmployeeSummary>> {
    let table = validate(read_input(m)?)?;
    let aggregates = aggregate(&table)?;
    Ok(aggregates
        .into_iter()
        .map(|a| EmployeeSummary {
            rows: a.transactions.len(),
            employee_id: a.employee_id,
            employee_name: a.employee_name,
            branch: a.branch,
            total_debit: a.total_debit,
            total_credit: a.total_credit,
        })
        .collect())
}
