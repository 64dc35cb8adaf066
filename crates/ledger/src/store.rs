use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use crate::model::{Account, CanonicalTrade};

/// The whole persisted ledger document.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LedgerData {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub trades: Vec<CanonicalTrade>,
}

impl LedgerData {
    pub fn account(&self, account_id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.account_id == account_id)
    }

    pub fn account_mut(&mut self, account_id: &str) -> Option<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|a| a.account_id == account_id)
    }
}

/// Ensures that ledger.json exists at the specified path. If it doesn't
/// exist, or holds something that doesn't deserialize, it is initialized
/// to the empty structure.
///
/// `ledger_path` may be a file path or a directory containing ledger.json.
pub fn ensure_ledger_exists<P: AsRef<Path>>(ledger_path: P) -> Result<PathBuf> {
    let ledger_file = resolve_ledger_file(ledger_path.as_ref());

    let needs_initialization = match File::open(&ledger_file) {
        Ok(mut file) => {
            let mut contents = String::new();
            file.read_to_string(&mut contents)?;
            serde_json::from_str::<LedgerData>(&contents).is_err()
        }
        Err(_) => true,
    };

    if needs_initialization {
        write_ledger(&ledger_file, &LedgerData::default())?;
    }

    Ok(ledger_file)
}

/// Reads the ledger file, initializing it first when necessary.
pub fn read_ledger<P: AsRef<Path>>(ledger_path: P) -> Result<LedgerData> {
    let ledger_file = ensure_ledger_exists(ledger_path)?;

    let mut file = File::open(&ledger_file)
        .with_context(|| format!("Cannot open ledger at {:?}", ledger_file))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Ledger at {:?} is not valid JSON", ledger_file))
}

/// Writes the ledger document, creating parent directories as needed.
pub fn write_ledger<P: AsRef<Path>>(ledger_path: P, data: &LedgerData) -> Result<PathBuf> {
    let ledger_file = resolve_ledger_file(ledger_path.as_ref());

    if let Some(parent) = ledger_file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(&ledger_file)
        .with_context(|| format!("Cannot create ledger file at {:?}", ledger_file))?;
    let formatted = serde_json::to_string_pretty(data)?;
    file.write_all(formatted.as_bytes())?;

    Ok(ledger_file)
}

fn resolve_ledger_file(path: &Path) -> PathBuf {
    if path.is_dir() || (!path.exists() && !path.to_string_lossy().ends_with(".json")) {
        path.join("ledger.json")
    } else {
        path.to_path_buf()
    }
}
