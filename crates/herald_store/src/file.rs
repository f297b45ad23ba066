//! File-backed state store.
//!
//! This module handles the file system layout for a Herald state directory:
//!
//! ```text
//! <state_dir>/
//! ├─ LOCK             # Advisory lock for single-runner
//! └─ published.log    # Append-only journal, one JSON record per line
//! ```
//!
//! The LOCK file ensures only one run can use the state directory at a time.
//! The journal persists published item ids across scheduled runs.

use crate::error::{StoreError, StoreResult};
use crate::store::StateStore;
use fs2::FileExt;
use herald_protocol::PublishedRecord;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// File names within the state directory.
const LOCK_FILE: &str = "LOCK";
const JOURNAL_FILE: &str = "published.log";

/// A journal-backed state store.
///
/// Opening the store acquires an exclusive advisory lock on the state
/// directory and replays the journal into memory. `record` appends one JSON
/// line per published item; `persist` fsyncs the journal so the record
/// survives process restarts.
///
/// # Thread Safety
///
/// The store is thread-safe, but only one `FileStateStore` instance can exist
/// per directory at a time; a second opener fails with [`StoreError::Locked`].
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    inner: Mutex<Inner>,
    /// Lock file handle (held for exclusive access, released on drop).
    _lock_file: File,
}

#[derive(Debug)]
struct Inner {
    journal: File,
    ids: HashSet<String>,
    records: Vec<PublishedRecord>,
}

impl FileStateStore {
    /// Opens or creates a state store at the given directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be created or the journal cannot be opened
    /// - Another process holds the lock (returns [`StoreError::Locked`])
    /// - The journal contains an unreadable record
    pub fn open(path: &Path) -> StoreResult<Self> {
        fs::create_dir_all(path)?;

        // Acquire exclusive lock (non-blocking)
        let lock_path = path.join(LOCK_FILE);
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(StoreError::Locked);
        }

        let journal_path = path.join(JOURNAL_FILE);
        let (ids, records) = replay_journal(&journal_path)?;

        let journal = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&journal_path)?;

        tracing::debug!(
            path = %path.display(),
            records = records.len(),
            "opened state store"
        );

        Ok(Self {
            path: path.to_path_buf(),
            inner: Mutex::new(Inner {
                journal,
                ids,
                records,
            }),
            _lock_file: lock_file,
        })
    }

    /// Returns the path to the state directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path to the journal file.
    #[must_use]
    pub fn journal_path(&self) -> PathBuf {
        self.path.join(JOURNAL_FILE)
    }
}

/// Replays the journal into an id index and an ordered record list.
///
/// A torn final line (crash mid-append) is skipped; corruption anywhere else
/// fails the replay, since publishing against an incomplete id set could
/// double-post.
fn replay_journal(path: &Path) -> StoreResult<(HashSet<String>, Vec<PublishedRecord>)> {
    let mut ids = HashSet::new();
    let mut records = Vec::new();

    if !path.exists() {
        return Ok((ids, records));
    }

    let reader = BufReader::new(File::open(path)?);
    let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;
    let last = lines.len().saturating_sub(1);

    for (index, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<PublishedRecord>(line) {
            Ok(record) => {
                if ids.insert(record.item_id.clone()) {
                    records.push(record);
                }
            }
            Err(err) if index == last => {
                tracing::warn!(line = index + 1, %err, "skipping torn journal tail");
            }
            Err(err) => {
                return Err(StoreError::Corrupted(format!("line {}: {err}", index + 1)));
            }
        }
    }

    Ok((ids, records))
}

impl StateStore for FileStateStore {
    fn contains(&self, item_id: &str) -> bool {
        self.inner.lock().ids.contains(item_id)
    }

    fn record(&self, record: PublishedRecord) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        if inner.ids.contains(&record.item_id) {
            return Ok(());
        }

        let mut line = serde_json::to_string(&record)
            .map_err(|e| StoreError::Corrupted(format!("unencodable record: {e}")))?;
        line.push('\n');
        inner.journal.write_all(line.as_bytes())?;

        inner.ids.insert(record.item_id.clone());
        inner.records.push(record);
        Ok(())
    }

    fn persist(&self) -> StoreResult<()> {
        let inner = self.inner.lock();
        inner.journal.sync_all()?;
        Ok(())
    }

    fn records(&self) -> Vec<PublishedRecord> {
        self.inner.lock().records.clone()
    }

    fn len(&self) -> usize {
        self.inner.lock().records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_directory() {
        let temp = tempdir().unwrap();
        let state_path = temp.path().join("state");

        assert!(!state_path.exists());

        let store = FileStateStore::open(&state_path).unwrap();
        assert!(state_path.is_dir());
        assert!(store.is_empty());
    }

    #[test]
    fn records_survive_reopen() {
        let temp = tempdir().unwrap();
        let state_path = temp.path().join("state");

        {
            let store = FileStateStore::open(&state_path).unwrap();
            store
                .record(PublishedRecord::new("feat-1", Some("post-1".into())))
                .unwrap();
            store.record(PublishedRecord::new("feat-2", None)).unwrap();
            store.persist().unwrap();
        }

        let store = FileStateStore::open(&state_path).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.contains("feat-1"));
        assert!(store.contains("feat-2"));
        assert_eq!(
            store.records()[0].target_post_id.as_deref(),
            Some("post-1")
        );
    }

    #[test]
    fn lock_prevents_second_open() {
        let temp = tempdir().unwrap();
        let state_path = temp.path().join("state");

        let _store = FileStateStore::open(&state_path).unwrap();

        let result = FileStateStore::open(&state_path);
        assert!(matches!(result, Err(StoreError::Locked)));
    }

    #[test]
    fn lock_released_on_drop() {
        let temp = tempdir().unwrap();
        let state_path = temp.path().join("state");

        {
            let _store = FileStateStore::open(&state_path).unwrap();
        }

        let _store2 = FileStateStore::open(&state_path).unwrap();
    }

    #[test]
    fn record_is_idempotent_on_disk() {
        let temp = tempdir().unwrap();
        let state_path = temp.path().join("state");

        {
            let store = FileStateStore::open(&state_path).unwrap();
            store.record(PublishedRecord::new("feat-1", None)).unwrap();
            store.record(PublishedRecord::new("feat-1", None)).unwrap();
            store.persist().unwrap();
        }

        let journal = fs::read_to_string(state_path.join(JOURNAL_FILE)).unwrap();
        assert_eq!(journal.lines().count(), 1);
    }

    #[test]
    fn torn_tail_is_skipped() {
        let temp = tempdir().unwrap();
        let state_path = temp.path().join("state");

        {
            let store = FileStateStore::open(&state_path).unwrap();
            store.record(PublishedRecord::new("feat-1", None)).unwrap();
            store.persist().unwrap();
        }

        // Simulate a crash mid-append.
        let journal_path = state_path.join(JOURNAL_FILE);
        let mut file = OpenOptions::new().append(true).open(&journal_path).unwrap();
        file.write_all(b"{\"item_id\":\"feat-2\",\"pub").unwrap();
        drop(file);

        let store = FileStateStore::open(&state_path).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.contains("feat-1"));
        assert!(!store.contains("feat-2"));
    }

    #[test]
    fn corruption_before_tail_fails_open() {
        let temp = tempdir().unwrap();
        let state_path = temp.path().join("state");
        fs::create_dir_all(&state_path).unwrap();

        fs::write(
            state_path.join(JOURNAL_FILE),
            "not json at all\n{\"item_id\":\"feat-1\",\"published_at\":\"2026-01-01T00:00:00Z\",\"target_post_id\":null}\n",
        )
        .unwrap();

        let result = FileStateStore::open(&state_path);
        assert!(matches!(result, Err(StoreError::Corrupted(_))));
    }

    #[test]
    fn duplicate_journal_lines_collapse_on_replay() {
        let temp = tempdir().unwrap();
        let state_path = temp.path().join("state");
        fs::create_dir_all(&state_path).unwrap();

        let line = "{\"item_id\":\"feat-1\",\"published_at\":\"2026-01-01T00:00:00Z\",\"target_post_id\":null}\n";
        fs::write(state_path.join(JOURNAL_FILE), format!("{line}{line}")).unwrap();

        let store = FileStateStore::open(&state_path).unwrap();
        assert_eq!(store.len(), 1);
    }
}
