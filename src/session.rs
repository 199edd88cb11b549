// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::aggregate::aggregate;
use crate::dispatch::{Dispatcher, Mailer};
use crate::errors::ReportError;
use crate::models::{DeliveryAttempt, RenderedReport};
use crate::render::{DocumentRenderer, render_report};
use crate::schema::validate;
use crate::table::Table;
use crate::utils::{report_filename, safe_file_name};

/// Validate, aggregate and render every employee in `table`. Nothing is
/// returned unless every step succeeds for every employee.
pub fn generate_reports<T: Table, R: DocumentRenderer>(
    table: T,
    as_of: NaiveDate,
    renderer: &R,
    currency: &str,
) -> Result<Vec<RenderedReport>, ReportError> {
    let validated = validate(table)?;
    let aggregates = aggregate(&validated)?;
    let mut reports = Vec::with_capacity(aggregates.len());
    for agg in &aggregates {
        let bytes = render_report(renderer, agg, as_of, currency)?;
        reports.push(RenderedReport {
            employee_id: agg.employee_id.clone(),
            employee_name: agg.employee_name.clone(),
            branch: agg.branch.clone(),
            as_of,
            filename: report_filename(&agg.employee_id, as_of),
            bytes,
        });
    }
    log::info!("generated {} report(s) as of {}", reports.len(), as_of);
    Ok(reports)
}

/// Send every report; a failure never stops the remaining sends.
pub fn send_all<M: Mailer>(
    reports: &[RenderedReport],
    dispatcher: &Dispatcher<M>,
) -> Vec<DeliveryAttempt> {
    reports
        .iter()
        .map(|report| {
            let outcome = dispatcher.dispatch(report);
            if let Err(e) = &outcome {
                log::warn!("delivery for {} failed: {}", report.employee_id, e);
            }
            DeliveryAttempt {
                employee_id: report.employee_id.clone(),
                employee_name: report.employee_name.clone(),
                recipient: dispatcher.recipient(report).to_string(),
                outcome,
            }
        })
        .collect()
}

pub fn all_sent(attempts: &[DeliveryAttempt]) -> bool {
    attempts.iter().all(DeliveryAttempt::is_ok)
}

/// Holds the most recently generated batch, in generation order.
#[derive(Debug, Default)]
pub struct ReportSession {
    reports: Vec<RenderedReport>,
}

impl ReportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held batch only when the whole run succeeds.
    pub fn generate_reports<T: Table, R: DocumentRenderer>(
        &mut self,
        table: T,
        as_of: NaiveDate,
        renderer: &R,
        currency: &str,
    ) -> Result<&[RenderedReport], ReportError> {
        self.reports = generate_reports(table, as_of, renderer, currency)?;
        Ok(&self.reports)
    }

    pub fn send_all<M: Mailer>(&self, dispatcher: &Dispatcher<M>) -> Vec<DeliveryAttempt> {
        send_all(&self.reports, dispatcher)
    }

    pub fn reset(&mut self) {
        self.reports.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn reports(&self) -> &[RenderedReport] {
        &self.reports
    }

    pub fn get(&self, employee_id: &str) -> Option<&RenderedReport> {
        self.reports.iter().find(|r| r.employee_id == employee_id)
    }

    /// Writes each report under `dir`, returning the written paths. Ids that
    /// sanitize to the same name get a numeric suffix instead of overwriting.
    pub fn write_all(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let mut taken = HashSet::new();
        let mut paths = Vec::with_capacity(self.reports.len());
        for report in &self.reports {
            let name = unique_name(safe_file_name(&report.filename), &mut taken);
            let path = dir.join(name);
            fs::write(&path, &report.bytes)?;
            paths.push(path);
        }
        Ok(paths)
    }
}

fn unique_name(name: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.clone()) {
        return name;
    }
    let (stem, ext) = match name.rfind('.') {
        Some(i) => name.split_at(i),
        None => (name.as_str(), ""),
    };
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}{}", stem, n, ext);
        if taken.insert(candidate.clone()) {
            log::warn!("{} already written in this batch, using {}", name, candidate);
            return candidate;
        }
        n += 1;
    }
}
