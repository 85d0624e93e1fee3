use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File-backed record of which vehicles this controller started charging.
///
/// The stop rule only applies to charging the controller itself started;
/// without this record a restart would stop charging the owner began by
/// hand.
#[derive(Debug)]
pub struct ChargeLedger {
    path: PathBuf,
    cars: HashMap<i64, LedgerEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    cars: HashMap<i64, LedgerEntry>,
}

impl ChargeLedger {
    /// Open the ledger in the default user data dir.
    pub fn open_default() -> Result<Self> {
        let path = directories::ProjectDirs::from("", "", "solarcharge")
            .map(|dirs| dirs.data_dir().join("ledger.json"))
            .ok_or_else(|| {
                Error::Configuration("cannot determine data directory".to_string())
            })?;
        Self::open(path)
    }

    /// Open a ledger file, creating an empty ledger when none exists yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cars = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<LedgerFile>(&raw)?.cars,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, cars })
    }

    pub fn is_charging_by_solar(&self, vehicle_id: i64) -> bool {
        self.cars.contains_key(&vehicle_id)
    }

    pub fn mark_started(&mut self, vehicle_id: i64) {
        self.cars.insert(
            vehicle_id,
            LedgerEntry {
                started_at: Utc::now(),
            },
        );
    }

    pub fn mark_stopped(&mut self, vehicle_id: i64) {
        self.cars.remove(&vehicle_id);
    }

    /// Write the ledger back to disk.
    pub fn persist(&self) -> Result<()> {
        ensure_parent(&self.path)?;
        let file = LedgerFile {
            cars: self.cars.clone(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
