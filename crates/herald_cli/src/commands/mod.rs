//! CLI command implementations.

pub mod run;
pub mod status;

use herald_store::{FileStateStore, MemoryStateStore, StateStore};
use std::error::Error;
use std::path::Path;

/// Opens the state store named by a DSN.
///
/// Accepts `memory://`, `file://<dir>`, or a plain directory path.
pub(crate) fn open_store(dsn: &str) -> Result<Box<dyn StateStore>, Box<dyn Error>> {
    if dsn == "memory://" {
        return Ok(Box::new(MemoryStateStore::new()));
    }

    let path = dsn.strip_prefix("file://").unwrap_or(dsn);
    let store = FileStateStore::open(Path::new(path))?;
    Ok(Box::new(store))
}
