//! File-backed JSON tables.
//!
//! Each table lives in one JSON file that is read and rewritten in full. A
//! per-file mutex serializes read-modify-write cycles, and every write goes to
//! a sibling `.tmp` file that is renamed over the target, so readers never
//! observe a truncated document.

use std::fs;
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};
use shared::models::{ConsistencyReport, TallyTable, UserTable};

pub const USERS_FILE: &str = "users.json";
pub const VOTES_FILE: &str = "votes.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Corrupt JSON in {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Lock on {} was poisoned", .0.display())]
    LockPoisoned(PathBuf),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io { path: path.to_path_buf(), source }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}

#[derive(Debug)]
pub struct JsonFile<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _table: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _table: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the table. A missing file reads as an empty table.
    pub fn read(&self) -> Result<T, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Runs one read-modify-write cycle under the file lock. The table is
    /// written back only when `apply` succeeds.
    pub fn update<R, E>(&self, apply: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.lock()?;
        let mut table = self.read()?;
        let outcome = apply(&mut table)?;
        self.write_atomic(&table)?;
        Ok(outcome)
    }

    /// Overwrites the table without reading it first, for recovering from an
    /// unreadable file.
    pub fn replace(&self, table: &T) -> Result<(), StoreError> {
        let _guard = self.lock()?;
        self.write_atomic(table)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned(self.path.clone()))
    }

    fn write_atomic(&self, table: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(table).map_err(|source| StoreError::Encode {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
        let written = file
            .write_all(&bytes)
            .and_then(|()| file.sync_all())
            .map_err(|e| StoreError::io(&tmp, e))
            .and_then(|()| fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e)));

        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&tmp) {
                warn!("Could not remove {}: {}", tmp.display(), cleanup);
            }
            return Err(e);
        }

        debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }
}

/// The credential and tally tables of one data directory.
///
/// Operations that write both tables hold the ballot lock for their whole
/// duration, so a vote and a reset never interleave. It is always taken
/// before either file lock.
#[derive(Debug)]
pub struct Store {
    users: JsonFile<UserTable>,
    tally: JsonFile<TallyTable>,
    seed: Vec<String>,
    ballot: Mutex<()>,
}

impl Store {
    /// Opens the tables under `data_dir`, creating missing files and adding
    /// any seed candidate absent from the tally with zero votes.
    ///
    /// An unreadable existing file is left untouched and reported; it stays
    /// broken until an administrator reinitializes it.
    pub fn open(data_dir: &Path, seed: &[String]) -> Result<Self, StoreError> {
        fs::create_dir_all(data_dir).map_err(|e| StoreError::io(data_dir, e))?;

        let store = Self {
            users: JsonFile::new(data_dir.join(USERS_FILE)),
            tally: JsonFile::new(data_dir.join(VOTES_FILE)),
            seed: seed.to_vec(),
            ballot: Mutex::new(()),
        };

        if !store.users.path().exists() {
            store.users.replace(&UserTable::new())?;
            info!("Created {}", store.users.path().display());
        }

        let seeded = store.tally.update(|tally| {
            let mut added = 0;
            for name in &store.seed {
                if !tally.contains_key(name) {
                    tally.insert(name.clone(), 0);
                    added += 1;
                }
            }
            Ok::<_, StoreError>(added)
        });

        match seeded {
            Ok(0) => {}
            Ok(added) => info!("Seeded {} candidate(s) into {}", added, store.tally.path().display()),
            Err(e) if e.is_corrupt() => warn!("Tally store needs reinitialization: {}", e),
            Err(e) => return Err(e),
        }

        Ok(store)
    }

    pub fn users(&self) -> &JsonFile<UserTable> {
        &self.users
    }

    pub fn tally(&self) -> &JsonFile<TallyTable> {
        &self.tally
    }

    /// Guard for a multi-table operation.
    pub fn ballot(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.ballot
            .lock()
            .map_err(|_| StoreError::LockPoisoned(self.users.path().with_file_name("ballot")))
    }

    /// Seed candidates with zero votes.
    pub fn initial_tally(&self) -> TallyTable {
        self.seed.iter().map(|name| (name.clone(), 0)).collect()
    }

    pub fn consistency_report(&self) -> Result<ConsistencyReport, StoreError> {
        Ok(ConsistencyReport::from_tables(&self.users.read()?, &self.tally.read()?))
    }
}
