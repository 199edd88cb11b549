// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use super::{config_path, load_config};
use crate::config::{self as cfg, AppConfig};

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("path", sub)) => println!("{}", config_path(sub)?.display()),
        Some(("show", sub)) => {
            let config = load_config(sub)?;
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        }
        Some(("init", sub)) => {
            let path = config_path(sub)?;
            if path.exists() && !sub.get_flag("force") {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            cfg::save(&path, &AppConfig::template())?;
            println!("Wrote starter config to {}", path.display());
        }
        _ => {}
    }
    Ok(())
}
