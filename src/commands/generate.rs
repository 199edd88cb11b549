// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use super::{as_of, optional_config, out_dir, read_input};
use crate::render::PdfRenderer;
use crate::session::ReportSession;
use crate::utils::{maybe_print_json, pretty_table};

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFile {
    pub employee_id: String,
    pub employee_name: String,
    pub branch: String,
    pub path: PathBuf,
    pub bytes: usize,
}

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let data = run(m)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|g| {
                vec![
                    g.employee_id.clone(),
                    g.employee_name.clone(),
                    g.branch.clone(),
                    g.path.display().to_string(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Employee", "Name", "Branch", "File"], rows));
        println!("Reports generated successfully: {}", data.len());
    }
    Ok(())
}

/// Renders and writes the batch; shared by `generate` and `send`.
pub(crate) fn build_session(m: &clap::ArgMatches, currency: &str) -> Result<ReportSession> {
    let date = as_of(m)?;
    let table = read_input(m)?;
    let mut session = ReportSession::new();
    session.generate_reports(table, date, &PdfRenderer, currency)?;
    Ok(session)
}

pub fn run(m: &clap::ArgMatches) -> Result<Vec<GeneratedFile>> {
    let config = optional_config(m)?;
    let currency = config.as_ref().map(|c| c.currency.as_str()).unwrap_or("Rs");
    let session = build_session(m, currency)?;
    let dir = out_dir(m, config.as_ref());
    let paths = session
        .write_all(&dir)
        .with_context(|| format!("Write reports to {}", dir.display()))?;
    Ok(session
        .reports()
        .iter()
        .zip(paths)
        .map(|(r, path)| GeneratedFile {
            employee_id: r.employee_id.clone(),
            employee_name: r.employee_name.clone(),
            branch: r.branch.clone(),
            path,
            bytes: r.bytes.len(),
        })
        .collect())
}
