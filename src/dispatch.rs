// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::{AppConfig, DEFAULT_BRANCH, SmtpConfig};
use crate::errors::{ConfigError, DeliveryError};
use crate::models::RenderedReport;

pub const PDF_MIME: &str = "application/pdf";

/// Branch name to manager address, with a mandatory fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchDirectory {
    entries: BTreeMap<String, String>,
    fallback: String,
}

impl BranchDirectory {
    pub fn new(mut entries: BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let fallback = entries
            .remove(DEFAULT_BRANCH)
            .ok_or(ConfigError::MissingDefaultBranch)?;
        Ok(Self { entries, fallback })
    }

    pub fn resolve(&self, branch: &str) -> &str {
        self.entries.get(branch).unwrap_or(&self.fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub from: String,
    pub directory: BranchDirectory,
}

impl MailSettings {
    pub fn from_config(cfg: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            from: cfg.sender().to_string(),
            directory: BranchDirectory::new(cfg.branches.clone())?,
        })
    }
}

/// Outbound mail capability.
pub trait Mailer {
    fn send(&self, message: &Message) -> Result<(), DeliveryError>;
}

impl<M: Mailer + ?Sized> Mailer for &M {
    fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        (**self).send(message)
    }
}

/// STARTTLS + login against a fixed relay.
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn from_config(cfg: &SmtpConfig) -> Result<Self, DeliveryError> {
        let transport = SmtpTransport::starttls_relay(&cfg.host)
            .map_err(|e| DeliveryError::Transport(e.to_string()))?
            .port(cfg.port)
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .timeout(Some(Duration::from_secs(30)))
            .build();
        Ok(Self { transport })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        self.transport
            .send(message)
            .map(|_| ())
            .map_err(|e| DeliveryError::Transport(e.to_string()))
    }
}

fn mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address.parse::<Mailbox>().map_err(|e| DeliveryError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

pub fn subject(report: &RenderedReport) -> String {
    format!(
        "EOD Report - {} ({})",
        report.employee_name,
        report.as_of.format("%Y-%m-%d")
    )
}

pub fn body(report: &RenderedReport) -> String {
    format!(
        "Please find attached the EOD banking report for {} ({} Branch).",
        report.employee_name, report.branch
    )
}

pub struct Dispatcher<M: Mailer> {
    settings: MailSettings,
    mailer: M,
}

impl<M: Mailer> Dispatcher<M> {
    pub fn new(settings: MailSettings, mailer: M) -> Self {
        Self { settings, mailer }
    }

    pub fn recipient(&self, report: &RenderedReport) -> &str {
        self.settings.directory.resolve(&report.branch)
    }

    pub fn build_message(&self, report: &RenderedReport) -> Result<Message, DeliveryError> {
        let content_type =
            ContentType::parse(PDF_MIME).map_err(|e| DeliveryError::Message(e.to_string()))?;
        let attachment =
            Attachment::new(report.filename.clone()).body(report.bytes.clone(), content_type);
        Message::builder()
            .from(mailbox(&self.settings.from)?)
            .to(mailbox(self.recipient(report))?)
            .subject(subject(report))
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body(report)))
                    .singlepart(attachment),
            )
            .map_err(|e| DeliveryError::Message(e.to_string()))
    }

    pub fn dispatch(&self, report: &RenderedReport) -> Result<(), DeliveryError> {
        let message = self.build_message(report)?;
        log::info!(
            "sending {} to {} for branch '{}'",
            report.filename,
            self.recipient(report),
            report.branch
        );
        self.mailer.send(&message)
    }
}
