// Crossbot – A crossword puzzle game
// Copyright (C) 2026  The Crossbot authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use super::game_state::GameState;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Everything remembered about one solver between commands.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverRecord {
    pub current_puzzle: Option<u32>,
    /// The puzzle most recently given up with `pass`.
    pub last_puzzle: Option<u32>,
    pub attempted: BTreeSet<u32>,
    pub completed: BTreeSet<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_state: Option<GameState>,
}

impl SolverRecord {
    /// Forgets the current puzzle and its progress.
    pub fn clear_current(&mut self) {
        self.current_puzzle = None;
        self.game_state = None;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: io::Error,
    },
    #[error("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub trait SolverStore: Send + Sync {
    /// Returns the record for `solver`, or an empty one if the solver
    /// hasn’t been seen before.
    fn load(&self, solver: &str) -> Result<SolverRecord, Error>;

    fn save(&self, solver: &str, record: &SolverRecord) -> Result<(), Error>;

    fn clear_all(&self) -> Result<(), Error>;
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, SolverRecord>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl SolverStore for MemoryStore {
    fn load(&self, solver: &str) -> Result<SolverRecord, Error> {
        Ok(self.records.lock().get(solver).cloned().unwrap_or_default())
    }

    fn save(&self, solver: &str, record: &SolverRecord) -> Result<(), Error> {
        self.records.lock().insert(solver.to_string(), record.clone());
        Ok(())
    }

    fn clear_all(&self) -> Result<(), Error> {
        self.records.lock().clear();
        Ok(())
    }
}

/// Keeps one JSON file per solver in a directory.
pub struct JsonStore {
    dir: PathBuf,
}

// Characters that are safe in a filename are kept and everything
// else is written as its hex code point between two ‘~’.
pub(crate) fn file_stem(solver: &str) -> String {
    let mut stem = String::with_capacity(solver.len());

    for ch in solver.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            stem.push(ch);
        } else {
            let _ = write!(stem, "~{:x}~", ch as u32);
        }
    }

    stem
}

impl JsonStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Result<JsonStore, Error> {
        let dir = dir.into();

        fs::create_dir_all(&dir).map_err(|source| Error::Io {
            path: dir.clone(),
            source,
        })?;

        Ok(JsonStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, solver: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(solver)))
    }

    fn write_record(
        &self,
        path: &Path,
        record: &SolverRecord,
    ) -> Result<(), Error> {
        let io_error = |source| Error::Io { path: path.to_owned(), source };

        let mut file = tempfile::NamedTempFile::new_in(&self.dir)
            .map_err(io_error)?;

        serde_json::to_writer_pretty(&mut file, record)
            .map_err(|source| Error::Json { path: path.to_owned(), source })?;

        file.persist(path).map_err(|e| io_error(e.error))?;

        Ok(())
    }
}

impl SolverStore for JsonStore {
    fn load(&self, solver: &str) -> Result<SolverRecord, Error> {
        let path = self.path(solver);

        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(SolverRecord::default());
            },
            Err(source) => return Err(Error::Io { path, source }),
        };

        serde_json::from_str(&data).map_err(|source| Error::Json {
            path,
            source,
        })
    }

    fn save(&self, solver: &str, record: &SolverRecord) -> Result<(), Error> {
        let path = self.path(solver);

        self.write_record(&path, record)?;

        log::debug!("saved record for {} to {}", solver, path.display());

        Ok(())
    }

    fn clear_all(&self) -> Result<(), Error> {
        let io_error = |path: &Path, source| {
            Error::Io { path: path.to_owned(), source }
        };

        let entries = fs::read_dir(&self.dir)
            .map_err(|e| io_error(self.dir.as_path(), e))?;

        let mut n_removed = 0;

        for entry in entries {
            let path = entry
                .map_err(|e| io_error(self.dir.as_path(), e))?
                .path();

            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).map_err(|e| io_error(&path, e))?;
                n_removed += 1;
            }
        }

        log::info!("cleared {} solver records", n_removed);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::puzzle_data::AnswerKind;
    use crate::puzzle_data::test::small_puzzle;

    fn sample_record() -> SolverRecord {
        let puzzle = small_puzzle(AnswerKind::Standard);
        let mut state = GameState::new(&puzzle).unwrap();
        state.commit(&puzzle, "1", "かざみ").unwrap();

        SolverRecord {
            current_puzzle: Some(7),
            last_puzzle: Some(2),
            attempted: [2, 7].into_iter().collect(),
            completed: [1].into_iter().collect(),
            game_state: Some(state),
        }
    }

    fn check_store(store: &dyn SolverStore) {
        assert_eq!(store.load("alice").unwrap(), SolverRecord::default());

        let record = sample_record();
        store.save("alice", &record).unwrap();
        store.save("bob", &SolverRecord::default()).unwrap();

        assert_eq!(store.load("alice").unwrap(), record);
        assert_eq!(store.load("bob").unwrap(), SolverRecord::default());

        let mut record = record;
        record.clear_current();
        store.save("alice", &record).unwrap();
        assert_eq!(store.load("alice").unwrap().current_puzzle, None);
        assert!(store.load("alice").unwrap().game_state.is_none());

        store.clear_all().unwrap();
        assert_eq!(store.load("alice").unwrap(), SolverRecord::default());
    }

    #[test]
    fn memory() {
        check_store(&MemoryStore::new());
    }

    #[test]
    fn json() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("records")).unwrap();

        check_store(&store);
    }

    #[test]
    fn json_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let record = sample_record();

        JsonStore::new(dir.path()).unwrap().save("12345", &record).unwrap();

        assert!(dir.path().join("12345.json").exists());
        assert_eq!(
            JsonStore::new(dir.path()).unwrap().load("12345").unwrap(),
            record,
        );
    }

    #[test]
    fn file_names() {
        assert_eq!(file_stem("12345"), "12345");
        assert_eq!(file_stem("a_b-C"), "a_b-C");
        assert_eq!(file_stem("../x"), "~2e~~2e~~2f~x");
        assert_eq!(file_stem("见"), "~89c1~");
    }

    #[test]
    fn corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path()).unwrap();

        fs::write(dir.path().join("bob.json"), "{ not json").unwrap();

        let error = store.load("bob").unwrap_err();
        assert!(matches!(error, Error::Json { .. }));
        assert!(error.to_string().contains("bob.json"));
    }

    #[test]
    fn clear_leaves_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path()).unwrap();

        store.save("alice", &sample_record()).unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        store.clear_all().unwrap();

        assert!(!dir.path().join("alice.json").exists());
        assert!(dir.path().join("notes.txt").exists());
    }
}
