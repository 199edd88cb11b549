// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod check;
pub mod config;
pub mod generate;
pub mod send;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::config::{self as cfg, AppConfig};
use crate::table::CsvTable;
use crate::utils::{parse_date, today};

pub(crate) fn config_path(m: &clap::ArgMatches) -> Result<PathBuf> {
    let explicit = m.get_one::<String>("config").map(|s| Path::new(s.trim()));
    Ok(cfg::resolve_path(explicit)?)
}

pub(crate) fn load_config(m: &clap::ArgMatches) -> Result<AppConfig> {
    let path = config_path(m)?;
    cfg::load(&path).with_context(|| {
        format!(
            "Load config {} (run `eodreport config init` to create one)",
            path.display()
        )
    })
}

/// Config when one exists; commands that never send mail can run without it.
pub(crate) fn optional_config(m: &clap::ArgMatches) -> Result<Option<AppConfig>> {
    let path = config_path(m)?;
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(None);
    }
    Ok(Some(cfg::load(&path).with_context(|| format!("Load config {}", path.display()))?))
}

pub(crate) fn read_input(m: &clap::ArgMatches) -> Result<CsvTable> {
    let path = m.get_one::<String>("input").context("--input is required")?.trim();
    CsvTable::from_path(path).with_context(|| format!("Error reading CSV {}", path))
}

pub(crate) fn as_of(m: &clap::ArgMatches) -> Result<NaiveDate> {
    match m.get_one::<String>("date") {
        Some(d) => parse_date(d.trim()),
        None => Ok(today()),
    }
}

pub(crate) fn out_dir(m: &clap::ArgMatches, config: Option<&AppConfig>) -> PathBuf {
    m.get_one::<String>("out_dir")
        .map(|s| PathBuf::from(s.trim()))
        .or_else(|| config.map(|c| c.output_dir.clone()))
        .unwrap_or_else(|| PathBuf::from("."))
}
