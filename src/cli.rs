// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("spendbook")
        .version(clap::crate_version!())
        .about("Personal expense ledger backed by CSV files")
        .arg(
            Arg::new("data_dir")
                .long("data-dir")
                .global(true)
                .value_name("PATH")
                .help("Directory holding the ledger files (default: $SPENDBOOK_DATA_DIR or platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the master ledger and import legacy monthly files"))
        .subcommand(
            Command::new("add")
                .about("Record an expense")
                .arg(Arg::new("description").long("description").short('d').required(true))
                .arg(Arg::new("amount").long("amount").short('a').required(true).allow_hyphen_values(true))
                .arg(Arg::new("category").long("category").short('c').required(true))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("YYYY-MM-DD, defaults to today"),
                ),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List expenses")
                .arg(Arg::new("month").long("month").help("YYYY-MM"))
                .arg(
                    Arg::new("current")
                        .long("current")
                        .action(ArgAction::SetTrue)
                        .help("Only the current month"),
                )
                .group(ArgGroup::new("period").args(["month", "current"])),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete an expense by id")
                .arg(Arg::new("id").long("id").required(true).value_parser(value_parser!(i64))),
        )
        .subcommand(
            Command::new("edit")
                .about("Change fields of an expense")
                .arg(Arg::new("id").long("id").required(true).value_parser(value_parser!(i64)))
                .arg(Arg::new("description").long("description").short('d'))
                .arg(Arg::new("amount").long("amount").short('a').allow_hyphen_values(true))
                .arg(Arg::new("category").long("category").short('c'))
                .arg(Arg::new("date").long("date")),
        )
        .subcommand(json_args(
            Command::new("summary")
                .about("Totals, average and breakdowns for a month (default: current)")
                .arg(Arg::new("month").long("month").help("YYYY-MM"))
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Summarize every expense"),
                )
                .group(ArgGroup::new("period").args(["month", "all"])),
        ))
        .subcommand(json_args(
            Command::new("monthly").about("All-time totals per calendar month"),
        ))
        .subcommand(json_args(
            Command::new("compare").about("Current month against the previous month"),
        ))
        .subcommand(
            Command::new("export")
                .about("Write every expense to a CSV file")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .help("Destination (default: expenses_export_<timestamp>.csv)"),
                ),
        )
        .subcommand(Command::new("categories").about("Suggested categories"))
        .subcommand(Command::new("doctor").about("Report rows the loaders cannot use"))
}
