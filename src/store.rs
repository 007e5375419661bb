//! Program persistence: a local key-value store and the program held over it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::error::{Result, ValidationError};
use crate::models::{Exercise, ExerciseDraft, ExerciseId, ExercisePatch, Program, WorkoutDay};
use crate::routines::default_program;

pub const STORAGE_KEY: &str = "workoutData";
pub const BACKUP_KEY: &str = "workoutData.bak";

/// String-keyed, string-valued storage, the way a browser's local storage works.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// A JSON object of keys to string values kept in one file.
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Missing file → empty store. An unreadable file is moved aside to
    /// `<name>.bak` and an empty store is started.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        debug!("FileStore::open path={}", path.display());
        if !path.exists() {
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
            });
        }
        let raw = fs::read_to_string(&path)?;
        let entries = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                let backup = backup_path(&path);
                warn!(
                    "Storage file {} is unreadable ({}), moving it to {}",
                    path.display(),
                    e,
                    backup.display()
                );
                fs::rename(&path, &backup)?;
                BTreeMap::new()
            }
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&self.entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryStore {
    pub entries: std::collections::HashMap<String, String>,
    pub writes: std::rc::Rc<std::cell::Cell<usize>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The workout program and the storage it is mirrored to.
///
/// Every successful mutation writes a full snapshot under [`STORAGE_KEY`].
/// A `Validation` error means nothing changed and nothing was written; any
/// other error comes from the write, after the in-memory change was made.
pub struct ProgramStore {
    program: Program,
    storage: Box<dyn KeyValueStore>,
    last_saved: Option<DateTime<Local>>,
}

impl ProgramStore {
    pub fn open(storage: Box<dyn KeyValueStore>) -> Result<Self> {
        let mut store = Self {
            program: default_program(),
            storage,
            last_saved: None,
        };
        match store.storage.get(STORAGE_KEY)? {
            Some(raw) => match serde_json::from_str::<Program>(&raw) {
                Ok(program) => {
                    info!("Loaded workout program with {} days", program.len());
                    store.program = program;
                }
                Err(e) => {
                    warn!("Stored program is malformed ({}), using the default program", e);
                    store.storage.set(BACKUP_KEY, &raw)?;
                    store.save()?;
                }
            },
            None => {
                info!("No stored program, seeding the default program");
                store.save()?;
            }
        }
        Ok(store)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.last_saved
    }

    /// Appends `"Day {n}: {name}"` with no exercises and returns its label.
    pub fn add_day(&mut self, name: &str, focus: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyDayName.into());
        }
        if focus.trim().is_empty() {
            return Err(ValidationError::EmptyFocus.into());
        }
        let label = format!("Day {}: {}", self.program.len() + 1, name);
        if self.program.contains(&label) {
            return Err(ValidationError::DuplicateDay(label).into());
        }
        debug!("add_day label={}", label);
        self.program.insert(label.clone(), WorkoutDay::new(focus));
        self.save()?;
        Ok(label)
    }

    pub fn delete_day(&mut self, label: &str) -> Result<WorkoutDay> {
        let removed = self
            .program
            .remove(label)
            .ok_or_else(|| ValidationError::UnknownDay(label.to_string()))?;
        debug!("delete_day label={}", label);
        self.save()?;
        Ok(removed)
    }

    pub fn add_exercise(&mut self, day: &str, draft: &ExerciseDraft) -> Result<ExerciseId> {
        let exercise = draft.to_exercise()?;
        let id = exercise.id;
        debug!("add_exercise day={} name={}", day, exercise.name);
        self.day_mut(day)?.exercises.push(exercise);
        self.save()?;
        Ok(id)
    }

    pub fn update_exercise(&mut self, day: &str, index: usize, patch: &ExercisePatch) -> Result<()> {
        let exercises = &mut self.day_mut(day)?.exercises;
        let len = exercises.len();
        let slot = exercises
            .get_mut(index)
            .ok_or_else(|| ValidationError::ExerciseOutOfRange {
                day: day.to_string(),
                index,
                len,
            })?;
        *slot = patch.apply(slot);
        debug!("update_exercise day={} index={}", day, index);
        self.save()
    }

    pub fn delete_exercise(&mut self, day: &str, index: usize) -> Result<Exercise> {
        let exercises = &mut self.day_mut(day)?.exercises;
        if index >= exercises.len() {
            return Err(ValidationError::ExerciseOutOfRange {
                day: day.to_string(),
                index,
                len: exercises.len(),
            }
            .into());
        }
        let removed = exercises.remove(index);
        debug!("delete_exercise day={} index={}", day, index);
        self.save()?;
        Ok(removed)
    }

    pub fn update_exercise_by_id(&mut self, day: &str, id: ExerciseId, patch: &ExercisePatch) -> Result<()> {
        let index = self.index_of(day, id)?;
        self.update_exercise(day, index, patch)
    }

    pub fn delete_exercise_by_id(&mut self, day: &str, id: ExerciseId) -> Result<Exercise> {
        let index = self.index_of(day, id)?;
        self.delete_exercise(day, index)
    }

    /// Replaces whatever is stored with the default program.
    pub fn reset(&mut self) -> Result<()> {
        info!("Resetting to the default program");
        self.program = default_program();
        self.save()
    }

    fn day_mut(&mut self, day: &str) -> std::result::Result<&mut WorkoutDay, ValidationError> {
        self.program
            .get_mut(day)
            .ok_or_else(|| ValidationError::UnknownDay(day.to_string()))
    }

    fn index_of(&self, day: &str, id: ExerciseId) -> Result<usize> {
        let workout_day = self
            .program
            .get(day)
            .ok_or_else(|| ValidationError::UnknownDay(day.to_string()))?;
        Ok(workout_day
            .position_of(id)
            .ok_or(ValidationError::ExerciseNotFound(id))?)
    }

    fn save(&mut self) -> Result<()> {
        let snapshot = serde_json::to_string(&self.program)?;
        self.storage.set(STORAGE_KEY, &snapshot)?;
        self.last_saved = Some(Local::now());
        debug!("Saved program ({} bytes)", snapshot.len());
        Ok(())
    }
}
