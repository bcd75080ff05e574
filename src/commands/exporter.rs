// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::default_export_name;
use crate::store::LedgerStore;
use anyhow::Result;
use std::path::PathBuf;

pub fn handle(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<PathBuf> {
    let out = match sub.get_one::<String>("out").map(|s| s.trim()) {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => PathBuf::from(default_export_name(chrono::Local::now().naive_local())),
    };
    let n = store.export_all(&out)?;
    println!("Exported {} expenses to {}", n, out.display());
    Ok(out)
}
