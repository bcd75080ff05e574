// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use env_logger::Env;

use spendbook::{LedgerStore, cli, commands, config::Settings};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let settings = Settings::resolve(matches.get_one::<String>("data_dir").map(String::as_str))?;
    let store = LedgerStore::from_settings(&settings);
    store
        .ensure_initialized()
        .with_context(|| format!("Initialize ledger at {}", store.master_path().display()))?;
    let report = store.migrate_if_needed(&store.default_legacy_sources())?;
    if report.rows_imported > 0 {
        println!(
            "Imported {} expenses from {} monthly files",
            report.rows_imported, report.sources_read
        );
    }

    let today = chrono::Local::now().date_naive();
    match matches.subcommand() {
        Some(("init", _)) => {
            println!(
                "Ledger ready in {} ({})",
                store.data_dir().display(),
                store.master_path().display()
            );
        }
        Some(("add", sub)) => {
            commands::expenses::add(&store, sub, today)?;
        }
        Some(("list", sub)) => commands::expenses::list(&store, sub, today)?,
        Some(("rm", sub)) => commands::expenses::remove(&store, sub)?,
        Some(("edit", sub)) => commands::expenses::edit(&store, sub)?,
        Some(("summary", sub)) => commands::reports::summary(&store, sub, today)?,
        Some(("monthly", sub)) => commands::reports::monthly(&store, sub, today)?,
        Some(("compare", sub)) => commands::reports::compare(&store, sub, today)?,
        Some(("export", sub)) => {
            commands::exporter::handle(&store, sub)?;
        }
        Some(("categories", _)) => commands::categories::handle()?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
