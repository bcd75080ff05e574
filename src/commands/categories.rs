// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::SUGGESTED_CATEGORIES;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle() -> Result<()> {
    let data = SUGGESTED_CATEGORIES
        .iter()
        .map(|c| vec![c.to_string()])
        .collect();
    println!("{}", pretty_table(&["Category"], data));
    println!("Any other non-empty name is accepted too.");
    Ok(())
}
