//! Flat-file JSON storage for tasks and notification preferences.
//!
//! Two files live in the data directory: `tasks.json` and
//! `preferences.json`, each holding a single JSON array. Reads never take
//! the write lock and degrade to empty data when a file is missing or
//! unparseable; the reminder pass would rather skip a minute's worth of
//! users than crash. Writes are serialized behind a lock and land via a
//! temp-file rename, so a reader only ever observes a fully-written file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::models::*;

const TASKS_FILE: &str = "tasks.json";
const PREFERENCES_FILE: &str = "preferences.json";

/// Point-in-time pairing of the two store files, read once per tick.
///
/// The scheduler works off this value alone for a whole tick, so a
/// concurrent CRUD write cannot change its mind halfway through a pass.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub preferences: Vec<UserPreference>,
}

/// Handle to the on-disk store. Cheap to clone; all clones share one
/// write lock.
pub struct Store {
    data_dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl Store {
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir).with_context(|| {
            format!("failed to create data directory {}", data_dir.display())
        })?;
        Ok(Self {
            data_dir,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "nudge")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::open(dirs.data_dir().to_path_buf())
    }

    fn tasks_path(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    fn preferences_path(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE)
    }

    // ============================================================
    // Read accessors (used by the scheduler, lock-free)
    // ============================================================

    pub fn read_tasks(&self) -> Result<Vec<Task>> {
        read_records(&self.tasks_path())
    }

    pub fn read_preferences(&self) -> Result<Vec<UserPreference>> {
        read_records(&self.preferences_path())
    }

    /// Read both files as one consistent value for a scheduler tick.
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            tasks: self.read_tasks()?,
            preferences: self.read_preferences()?,
        })
    }

    // ============================================================
    // Task operations
    // ============================================================

    pub fn create_task(&self, input: CreateTaskInput) -> Result<Task> {
        let _guard = self.write_lock.lock().expect("store lock poisoned");

        let mut tasks = self.read_tasks()?;
        let task = Task {
            id: Uuid::new_v4(),
            email: input.email,
            description: input.description,
            completed: false,
        };
        tasks.push(task.clone());
        write_records(&self.tasks_path(), &tasks)?;

        Ok(task)
    }

    pub fn set_task_completed(&self, id: Uuid, completed: bool) -> Result<Option<Task>> {
        let _guard = self.write_lock.lock().expect("store lock poisoned");

        let mut tasks = self.read_tasks()?;
        let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(None);
        };
        task.completed = completed;
        let updated = task.clone();
        write_records(&self.tasks_path(), &tasks)?;

        Ok(Some(updated))
    }

    pub fn delete_task(&self, id: Uuid) -> Result<bool> {
        let _guard = self.write_lock.lock().expect("store lock poisoned");

        let mut tasks = self.read_tasks()?;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        if tasks.len() == before {
            return Ok(false);
        }
        write_records(&self.tasks_path(), &tasks)?;

        Ok(true)
    }

    // ============================================================
    // Preference operations
    // ============================================================

    pub fn get_preference(&self, email: &str) -> Result<Option<UserPreference>> {
        Ok(self
            .read_preferences()?
            .into_iter()
            .find(|pref| pref.email == email))
    }

    /// Replace the record for the address, or append a new one. At most
    /// one record per email survives a successful write.
    pub fn upsert_preference(&self, input: SetPreferenceInput) -> Result<UserPreference> {
        let _guard = self.write_lock.lock().expect("store lock poisoned");

        let mut preferences = self.read_preferences()?;
        let record = UserPreference {
            email: input.email,
            notification_time: input.notification_time,
        };
        match preferences.iter_mut().find(|pref| pref.email == record.email) {
            Some(existing) => *existing = record.clone(),
            None => preferences.push(record.clone()),
        }
        write_records(&self.preferences_path(), &preferences)?;

        Ok(record)
    }
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            data_dir: self.data_dir.clone(),
            write_lock: self.write_lock.clone(),
        }
    }
}

/// Read a whole file, then parse. A missing file means "no records yet";
/// an unparseable file is logged and treated the same way.
fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()))
        }
    };

    match serde_json::from_str(&data) {
        Ok(records) => Ok(records),
        Err(err) => {
            tracing::warn!("ignoring unparseable {}: {}", path.display(), err);
            Ok(Vec::new())
        }
    }
}

fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
