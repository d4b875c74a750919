use std::path::{Path, PathBuf};

use chrono::Local;
use csv::{ReaderBuilder, Trim, WriterBuilder};

use crate::error::{AppError, Result};
use crate::models::{CreatorRecord, CreatorUpdate};

/// Header row of the roster file, in column order.
pub const ROSTER_COLUMNS: [&str; 7] = [
    "Creator Name",
    "Channel ID",
    "Notes",
    "Requests",
    "Priority",
    "Status",
    "Last Updated",
];

/// Creator roster persisted as a CSV file keyed by creator name.
///
/// Every mutation is a full read-modify-write of the file. There is no locking:
/// two processes editing the same roster can overwrite each other.
pub struct RosterStore {
    path: PathBuf,
}

impl RosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all creators. A missing file is initialized with the header row.
    pub fn load(&self) -> Result<Vec<CreatorRecord>> {
        if !self.path.exists() {
            tracing::info!("Roster not found, creating {}", self.path.display());
            self.save(&[])?;
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for row in reader.deserialize::<CreatorRecord>() {
            let record = row?;
            if record.name.is_empty() {
                continue;
            }
            records.push(record);
        }

        Ok(records)
    }

    /// Replace the file contents with `records`.
    pub fn save(&self, records: &[CreatorRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("csv.tmp");
        {
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp_path)?;
            writer.write_record(ROSTER_COLUMNS)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        std::fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    pub fn find(&self, name: &str) -> Result<Option<CreatorRecord>> {
        let name = name.trim();
        Ok(self.load()?.into_iter().find(|r| r.name == name))
    }

    /// Append a creator. Fails with `DuplicateCreator` if the name is taken;
    /// the file is left untouched in that case.
    pub fn add(&self, mut record: CreatorRecord) -> Result<()> {
        record.name = record.name.trim().to_string();
        record.channel_id = record.channel_id.trim().to_string();

        if record.name.is_empty() {
            return Err(AppError::InvalidCreator("creator name is empty".into()));
        }
        if record.channel_id.is_empty() {
            return Err(AppError::InvalidCreator(format!(
                "no channel id for '{}'",
                record.name
            )));
        }

        let mut records = self.load()?;
        if records.iter().any(|r| r.name == record.name) {
            return Err(AppError::DuplicateCreator(record.name));
        }

        record.last_updated = Some(Local::now().date_naive());
        tracing::info!("Adding creator {} ({})", record.name, record.channel_id);
        records.push(record);
        self.save(&records)
    }

    /// Delete a creator by name. Returns `false`, without rewriting the file,
    /// when no creator has that name.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.name != name);

        if records.len() == before {
            tracing::debug!("Remove skipped, {} is not in the roster", name);
            return Ok(false);
        }

        tracing::info!("Removing creator {}", name);
        self.save(&records)?;
        Ok(true)
    }

    /// Apply a partial edit to the named creator. Returns `false` if not found.
    pub fn update(&self, name: &str, update: CreatorUpdate) -> Result<bool> {
        let name = name.trim();
        let mut records = self.load()?;

        let Some(record) = records.iter_mut().find(|r| r.name == name) else {
            return Ok(false);
        };

        record.apply(update);
        if record.channel_id.trim().is_empty() {
            return Err(AppError::InvalidCreator(format!(
                "no channel id for '{name}'"
            )));
        }
        record.last_updated = Some(Local::now().date_naive());

        tracing::info!("Updated creator {}", name);
        self.save(&records)?;
        Ok(true)
    }
}
