// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn input_arg() -> Arg {
    Arg::new("input")
        .long("input")
        .short('i')
        .value_name("CSV")
        .required(true)
        .help("Transaction CSV to read")
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .value_name("YYYY-MM-DD")
        .help("As-of date stamped on the batch (default: today)")
}

fn out_dir_arg() -> Arg {
    Arg::new("out_dir")
        .long("out-dir")
        .value_name("DIR")
        .help("Where PDFs are written (default: config output_dir)")
}

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("eodreport")
        .version(crate_version!())
        .about("End-of-day banking reports: one PDF per employee, mailed to the branch manager")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .global(true)
                .help("Config file (default: per-user config dir)"),
        )
        .subcommand(
            Command::new("check")
                .about("Validate a CSV and preview per-employee totals")
                .arg(input_arg())
                .args(json_args()),
        )
        .subcommand(
            Command::new("generate")
                .about("Render one PDF per employee")
                .arg(input_arg())
                .arg(date_arg())
                .arg(out_dir_arg())
                .args(json_args()),
        )
        .subcommand(
            Command::new("send")
                .about("Render and email every report to its branch manager")
                .arg(input_arg())
                .arg(date_arg())
                .arg(out_dir_arg())
                .arg(
                    Arg::new("dry_run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Show recipients without contacting the mail server"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Inspect or create the configuration file")
                .subcommand(Command::new("path").about("Print the config file location"))
                .subcommand(Command::new("show").about("Print the config with the password masked"))
                .subcommand(
                    Command::new("init").about("Write a starter config").arg(
                        Arg::new("force")
                            .long("force")
                            .action(ArgAction::SetTrue)
                            .help("Overwrite an existing file"),
                    ),
                ),
        )
}
