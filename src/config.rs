// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.spendbook", "Spendbook", "spendbook"));

pub const DATA_DIR_ENV: &str = "SPENDBOOK_DATA_DIR";
pub const MASTER_FILE: &str = "all_expenses.csv";
pub const HEADER: [&str; 5] = ["Id", "Description", "Expense_Type", "Amount", "Date"];

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
}

impl Settings {
    /// Resolve the data directory: explicit flag, then `SPENDBOOK_DATA_DIR`,
    /// then the platform data dir.
    pub fn resolve(flag: Option<&str>) -> Result<Self> {
        let env_dir = std::env::var(DATA_DIR_ENV).ok();
        Self::resolve_with(flag, env_dir.as_deref())
    }

    pub fn resolve_with(flag: Option<&str>, env_dir: Option<&str>) -> Result<Self> {
        let chosen = [flag, env_dir]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(PathBuf::from);
        let data_dir = match chosen {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;
        Ok(Settings { data_dir })
    }

    pub fn master_path(&self) -> PathBuf {
        master_path_in(&self.data_dir)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().to_path_buf())
}

pub fn master_path_in(dir: &Path) -> PathBuf {
    dir.join(MASTER_FILE)
}

/// Monthly backup file for a calendar month (1-12), e.g. `January.csv`.
pub fn monthly_path_in(dir: &Path, month: u32) -> Option<PathBuf> {
    crate::utils::month_name(month).map(|name| dir.join(format!("{}.csv", name)))
}

pub fn default_export_name(now: chrono::NaiveDateTime) -> String {
    format!("expenses_export_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
