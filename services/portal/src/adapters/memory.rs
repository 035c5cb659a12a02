//! services/portal/src/adapters/memory.rs
//!
//! In-process session storage, for tests and for runs that should not
//! leave a session behind.

use portal_core::ports::{PersistedSession, PortResult, SessionStorage};
use std::sync::Mutex;

#[derive(Default)]
pub struct MemorySessionStorage {
    record: Mutex<PersistedSession>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing record, as if it had been persisted by an earlier run.
    pub fn with_record(record: PersistedSession) -> Self {
        Self {
            record: Mutex::new(record),
        }
    }

    pub fn snapshot(&self) -> PersistedSession {
        self.record.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> PortResult<PersistedSession> {
        Ok(self.snapshot())
    }

    fn save(&self, record: &PersistedSession) -> PortResult<()> {
        *self.record.lock().unwrap_or_else(|e| e.into_inner()) = record.clone();
        Ok(())
    }

    fn clear(&self) -> PortResult<()> {
        *self.record.lock().unwrap_or_else(|e| e.into_inner()) = PersistedSession::default();
        Ok(())
    }
}
