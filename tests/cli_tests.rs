// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use eodreport::config::{self, AppConfig};
use eodreport::dispatch::{Dispatcher, MailSettings, Mailer};
use eodreport::errors::DeliveryError;
use eodreport::{cli, commands};
use lettre::Message;
use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, tempdir};

const HEADER: &str = "EmployeeID,EmployeeName,TransactionID,Date,Amount,Type,Description,Branch,\
Gold Loan Paid,Gold Loan Remaining,Home Loan Paid,Home Loan Remaining,Education Loan Paid,Education Loan Remaining";

fn input_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "{}\n\
         E1,Asha,T1,2025-03-01,100,Debit,ATM,Mumbai,10,90,0,0,0,0\n\
         E2,Ravi,T2,2025-03-01,40,Credit,Deposit,Chennai,0,0,0,0,0,0\n\
         E1,Asha,T3,2025-03-01,50,Debit,POS,Mumbai,10,80,0,0,0,0\n\
         E1,Asha,T4,2025-03-01,30,Credit,Refund,Mumbai,0,0,0,0,0,0",
        HEADER
    )
    .unwrap();
    file.flush().unwrap();
    file
}

fn write_config(dir: &Path, out_dir: &Path) -> std::path::PathBuf {
    let mut cfg = AppConfig::template();
    cfg.branches
        .insert("Mumbai".into(), "mumbai@bank.example".into());
    cfg.branches.insert("Default".into(), "ops@bank.example".into());
    cfg.output_dir = out_dir.to_path_buf();
    let path = dir.join("config.json");
    config::save(&path, &cfg).unwrap();
    path
}

#[derive(Default)]
struct RecordingMailer {
    to: RefCell<Vec<String>>,
}

impl Mailer for RecordingMailer {
    fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        self.to
            .borrow_mut()
            .push(message.envelope().to()[0].to_string());
        Ok(())
    }
}

#[test]
fn check_summarizes_per_employee() {
    let file = input_file();
    let path = file.path().to_str().unwrap().to_string();
    let matches = cli::build_cli().get_matches_from(["eodreport", "check", "--input", &path]);
    if let Some(("check", sub)) = matches.subcommand() {
        let rows = commands::check::summaries(sub).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].employee_id, "E1");
        assert_eq!(rows[0].rows, 3);
        assert_eq!(rows[0].total_debit.to_string(), "150");
        assert_eq!(rows[0].total_credit.to_string(), "30");
        assert_eq!(rows[1].branch, "Chennai");
    } else {
        panic!("no check subcommand");
    }
}

#[test]
fn check_rejects_missing_columns() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "EmployeeID,Amount\nE1,5").unwrap();
    file.flush().unwrap();
    let path = file.path().to_str().unwrap().to_string();
    let matches = cli::build_cli().get_matches_from(["eodreport", "check", "--input", &path]);
    if let Some(("check", sub)) = matches.subcommand() {
        let err = commands::check::handle(sub).unwrap_err();
        assert!(err.to_string().contains("Education Loan Remaining"));
    } else {
        panic!("no check subcommand");
    }
}

#[test]
fn generate_writes_one_pdf_per_employee() {
    let file = input_file();
    let path = file.path().to_str().unwrap().to_string();
    let cfg_dir = tempdir().unwrap();
    let out = tempdir().unwrap();
    let cfg_path = cfg_dir.path().join("absent.json");
    let out_str = out.path().to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from([
        "eodreport",
        "generate",
        "--config",
        cfg_path.to_str().unwrap(),
        "--input",
        &path,
        "--date",
        "2025-03-01",
        "--out-dir",
        &out_str,
    ]);
    if let Some(("generate", sub)) = matches.subcommand() {
        let files = commands::generate::run(sub).unwrap();
        assert_eq!(files.len(), 2);
    } else {
        panic!("no generate subcommand");
    }
    for id in ["E1", "E2"] {
        let pdf = out.path().join(format!("EOD_Report_{}_2025-03-01.pdf", id));
        let bytes = std::fs::read(&pdf).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}

#[test]
fn generate_rejects_bad_date() {
    let file = input_file();
    let path = file.path().to_str().unwrap().to_string();
    let matches = cli::build_cli().get_matches_from([
        "eodreport", "generate", "--input", &path, "--date", "01/03/2025",
    ]);
    if let Some(("generate", sub)) = matches.subcommand() {
        assert!(commands::generate::run(sub).is_err());
    } else {
        panic!("no generate subcommand");
    }
}

#[test]
fn send_delivers_each_report_to_its_branch() {
    let file = input_file();
    let path = file.path().to_str().unwrap().to_string();
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let cfg_path = write_config(dir.path(), &out);
    let matches = cli::build_cli().get_matches_from([
        "eodreport",
        "send",
        "--config",
        cfg_path.to_str().unwrap(),
        "--input",
        &path,
        "--date",
        "2025-03-01",
    ]);
    if let Some(("send", sub)) = matches.subcommand() {
        let cfg = config::load(&cfg_path).unwrap();
        let mailer = RecordingMailer::default();
        let dispatcher = Dispatcher::new(MailSettings::from_config(&cfg).unwrap(), &mailer);
        let attempts = commands::send::deliver(sub, &cfg, dispatcher).unwrap();
        assert_eq!(attempts.len(), 2);
        assert!(attempts.iter().all(|a| a.is_ok()));
        assert_eq!(
            *mailer.to.borrow(),
            vec!["mumbai@bank.example".to_string(), "ops@bank.example".to_string()]
        );
    } else {
        panic!("no send subcommand");
    }
    assert!(out.join("EOD_Report_E1_2025-03-01.pdf").exists());
}

#[test]
fn send_dry_run_lists_recipients() {
    let file = input_file();
    let path = file.path().to_str().unwrap().to_string();
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let cfg_path = write_config(dir.path(), &out);
    let matches = cli::build_cli().get_matches_from([
        "eodreport",
        "send",
        "--dry-run",
        "--config",
        cfg_path.to_str().unwrap(),
        "--input",
        &path,
        "--date",
        "2025-03-01",
    ]);
    if let Some(("send", sub)) = matches.subcommand() {
        let cfg = config::load(&cfg_path).unwrap();
        let settings = MailSettings::from_config(&cfg).unwrap();
        let rows = commands::send::plan(sub, &cfg.currency, &settings).unwrap();
        assert_eq!(rows[0][3], "mumbai@bank.example");
        assert_eq!(rows[1][3], "ops@bank.example");
        assert_eq!(rows[1][4], "EOD_Report_E2_2025-03-01.pdf");
        commands::send::handle(sub).unwrap();
    } else {
        panic!("no send subcommand");
    }
    assert!(!out.exists());
}

#[test]
fn config_init_writes_template_and_refuses_overwrite() {
    let dir = tempdir().unwrap();
    let cfg_path = dir.path().join("nested").join("config.json");
    let cfg_str = cfg_path.to_str().unwrap().to_string();

    let matches =
        cli::build_cli().get_matches_from(["eodreport", "config", "init", "--config", &cfg_str]);
    if let Some(("config", sub)) = matches.subcommand() {
        commands::config::handle(sub).unwrap();
        assert!(commands::config::handle(sub).is_err());
    } else {
        panic!("no config subcommand");
    }
    let loaded = config::load(&cfg_path).unwrap();
    assert_eq!(loaded, AppConfig::template());
    assert_eq!(loaded.smtp.port, 587);
}

#[test]
fn config_without_default_branch_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut cfg = AppConfig::template();
    cfg.branches.remove("Default");
    config::save(&path, &cfg).unwrap();
    assert!(config::load(&path).is_err());
}

#[test]
fn redacted_config_hides_password() {
    let cfg = AppConfig::template();
    let shown = serde_json::to_string(&cfg.redacted()).unwrap();
    assert!(!shown.contains("app-password"));
}
