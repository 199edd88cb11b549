// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};

use super::generate::build_session;
use super::{load_config, out_dir};
use crate::config::AppConfig;
use crate::dispatch::{Dispatcher, MailSettings, Mailer, SmtpMailer};
use crate::models::DeliveryAttempt;
use crate::session::all_sent;
use crate::utils::pretty_table;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let config = load_config(m)?;
    let settings = MailSettings::from_config(&config)?;
    if m.get_flag("dry_run") {
        let rows = plan(m, &config.currency, &settings)?;
        println!(
            "{}",
            pretty_table(&["Employee", "Name", "Branch", "Recipient", "File"], rows)
        );
        return Ok(());
    }
    let mailer = SmtpMailer::from_config(&config.smtp)?;
    let attempts = deliver(m, &config, Dispatcher::new(settings, mailer))?;
    report(&attempts)
}

/// Recipient table for `--dry-run`; nothing is written or sent.
pub fn plan(
    m: &clap::ArgMatches,
    currency: &str,
    settings: &MailSettings,
) -> Result<Vec<Vec<String>>> {
    let session = build_session(m, currency)?;
    Ok(session
        .reports()
        .iter()
        .map(|r| {
            vec![
                r.employee_id.clone(),
                r.employee_name.clone(),
                r.branch.clone(),
                settings.directory.resolve(&r.branch).to_string(),
                r.filename.clone(),
            ]
        })
        .collect())
}

/// Generates, writes and sends the batch with the given dispatcher.
pub fn deliver<M: Mailer>(
    m: &clap::ArgMatches,
    config: &AppConfig,
    dispatcher: Dispatcher<M>,
) -> Result<Vec<DeliveryAttempt>> {
    let mut session = build_session(m, &config.currency)?;
    if session.is_empty() {
        println!("No reports to send: the CSV has no transaction rows.");
        return Ok(Vec::new());
    }
    let dir = out_dir(m, Some(config));
    session
        .write_all(&dir)
        .with_context(|| format!("Write reports to {}", dir.display()))?;
    let attempts = session.send_all(&dispatcher);
    session.reset();
    Ok(attempts)
}

fn report(attempts: &[DeliveryAttempt]) -> Result<()> {
    for a in attempts {
        match &a.outcome {
            Ok(()) => println!("Email sent to {} for {}", a.recipient, a.employee_name),
            Err(e) => eprintln!("Failed to send email for {}: {}", a.employee_name, e),
        }
    }
    if all_sent(attempts) {
        if !attempts.is_empty() {
            println!("All {} reports sent.", attempts.len());
        }
        return Ok(());
    }
    let failed = attempts.iter().filter(|a| !a.is_ok()).count();
    Err(anyhow!("{} of {} deliveries failed", failed, attempts.len()))
}
