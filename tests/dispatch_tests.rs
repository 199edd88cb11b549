// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use eodreport::dispatch::{BranchDirectory, Dispatcher, MailSettings, Mailer, subject};
use eodreport::errors::{ConfigError, DeliveryError};
use eodreport::models::RenderedReport;
use lettre::Message;
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Default)]
struct RecordingMailer {
    sent: RefCell<Vec<Message>>,
}

impl Mailer for RecordingMailer {
    fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        self.sent.borrow_mut().push(message.clone());
        Ok(())
    }
}

fn directory() -> BTreeMap<String, String> {
    let mut m = BTreeMap::new();
    m.insert("Mumbai".to_string(), "mumbai.manager@bank.example".to_string());
    m.insert("Delhi".to_string(), "delhi.manager@bank.example".to_string());
    m.insert("Default".to_string(), "ops@bank.example".to_string());
    m
}

fn settings() -> MailSettings {
    MailSettings {
        from: "reports@bank.example".into(),
        directory: BranchDirectory::new(directory()).unwrap(),
    }
}

fn report(branch: &str) -> RenderedReport {
    RenderedReport {
        employee_id: "E1".into(),
        employee_name: "Asha Rao".into(),
        branch: branch.into(),
        as_of: as_of(),
        filename: "EOD_Report_E1_2025-03-01.pdf".into(),
        bytes: b"%PDF-1.3 test".to_vec(),
    }
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

#[test]
fn known_branch_resolves_to_its_manager() {
    let dir = BranchDirectory::new(directory()).unwrap();
    assert_eq!(dir.resolve("Delhi"), "delhi.manager@bank.example");
}

#[test]
fn unknown_branch_falls_back_to_default() {
    let mailer = RecordingMailer::default();
    let d = Dispatcher::new(settings(), &mailer);
    d.dispatch(&report("Chennai")).unwrap();
    let sent = mailer.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].envelope().to()[0].to_string(), "ops@bank.example");
}

#[test]
fn directory_requires_default_entry() {
    let mut m = directory();
    m.remove("Default");
    assert!(matches!(
        BranchDirectory::new(m),
        Err(ConfigError::MissingDefaultBranch)
    ));
}

#[test]
fn message_carries_subject_and_pdf_attachment() {
    let mailer = RecordingMailer::default();
    let d = Dispatcher::new(settings(), &mailer);
    d.dispatch(&report("Mumbai")).unwrap();
    let sent = mailer.sent.borrow();
    let msg = &sent[0];
    assert_eq!(msg.envelope().from().unwrap().to_string(), "reports@bank.example");
    assert_eq!(msg.envelope().to()[0].to_string(), "mumbai.manager@bank.example");
    let raw = String::from_utf8(msg.formatted()).unwrap();
    assert!(raw.contains("Subject: EOD Report - Asha Rao (2025-03-01)"));
    assert!(raw.contains("application/pdf"));
    assert!(raw.contains("EOD_Report_E1_2025-03-01.pdf"));
}

#[test]
fn bad_recipient_is_a_delivery_error() {
    let mut m = directory();
    m.insert("Pune".to_string(), "not an address".to_string());
    let s = MailSettings {
        from: "reports@bank.example".into(),
        directory: BranchDirectory::new(m).unwrap(),
    };
    let mailer = RecordingMailer::default();
    let d = Dispatcher::new(s, &mailer);
    let err = d.dispatch(&report("Pune")).unwrap_err();
    assert!(matches!(err, DeliveryError::Address { .. }));
    assert!(mailer.sent.borrow().is_empty());
}

#[test]
fn subject_uses_the_report_date() {
    let mut r = report("Mumbai");
    r.as_of = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();
    assert_eq!(subject(&r), "EOD Report - Asha Rao (2025-04-30)");
}
