//! JSON-file event journal.
//!
//! The local `EventStore` implementation the daemon ships, so presence
//! tracking works end to end without remote calendar credentials. Records
//! are kept in one JSON file, rewritten atomically (tmp + rename) on every
//! store call.

use chrono::{DateTime, Utc};
use fs_err as fs;
use nethome_core::{Error, EventStore, EventWrite, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EventRecord {
    id: String,
    title: String,
    color_id: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Journal {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    events: Vec<EventRecord>,
}

/// Event store backed by a single JSON file.
#[derive(Debug)]
pub struct JournalStore {
    path: PathBuf,
    journal: Journal,
}

impl JournalStore {
    /// Opens the journal at `path`, starting empty if the file is absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let journal = load_journal(&path)?;
        Ok(Self { path, journal })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of events recorded in the journal.
    pub fn len(&self) -> usize {
        self.journal.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journal.events.is_empty()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| store_error("create journal dir", &err))?;
        }
        let payload = serde_json::to_vec_pretty(&self.journal)
            .map_err(|err| store_error("serialize journal", &err))?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload).map_err(|err| store_error("write journal", &err))?;
        fs::rename(&tmp_path, &self.path).map_err(|err| store_error("commit journal", &err))?;
        Ok(())
    }
}

impl EventStore for JournalStore {
    fn create(&mut self, event: &EventWrite) -> Result<String> {
        let id = format!("evt-{:06}", self.journal.next_id + 1);
        self.journal.events.push(EventRecord {
            id: id.clone(),
            title: event.title.clone(),
            color_id: event.color_id.clone(),
            start: event.start,
            end: event.end,
        });
        match self.persist() {
            Ok(()) => {
                self.journal.next_id += 1;
                Ok(id)
            }
            Err(err) => {
                // Roll back so a retried create does not leave a ghost record.
                self.journal.events.pop();
                Err(err)
            }
        }
    }

    fn update(&mut self, event_id: &str, event: &EventWrite) -> Result<String> {
        let record = self
            .journal
            .events
            .iter_mut()
            .find(|record| record.id == event_id)
            .ok_or_else(|| Error::Store {
                context: format!("unknown event id: {}", event_id),
            })?;
        record.title = event.title.clone();
        record.color_id = event.color_id.clone();
        record.start = event.start;
        record.end = event.end;
        self.persist()?;
        Ok(event_id.to_string())
    }
}

fn load_journal(path: &Path) -> Result<Journal> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Journal::default()),
        Err(err) => return Err(store_error("read journal", &err)),
    };
    serde_json::from_slice(&data).map_err(|err| store_error("parse journal", &err))
}

fn store_error(context: &str, err: &dyn std::fmt::Display) -> Error {
    Error::Store {
        context: format!("{}: {}", context, err),
    }
}
