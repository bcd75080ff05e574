// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::LedgerStore;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(store: &LedgerStore) -> Result<()> {
    let issues = store.inspect()?;
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
        return Ok(());
    }
    let rows = issues
        .into_iter()
        .map(|i| vec![i.row.to_string(), i.id, i.problem])
        .collect();
    println!("{}", pretty_table(&["Row", "Id", "Issue"], rows));
    Ok(())
}
