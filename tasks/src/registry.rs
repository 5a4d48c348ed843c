//! Process-wide table of live thread wrappers, keyed by kernel thread id.
//!
//! The table stores copyable records rather than references into the owning
//! [`ThreadHandle`](crate::ThreadHandle), so a lookup result stays safe to
//! use even if the handle is dropped right after the lookup.

use alloc::collections::btree_map::BTreeMap;

use errors::{Errno, Result};
use rtos_hal::task::{ThreadEntry, ThreadId};
use spin::{Mutex, Once};

/// What the registry knows about one live [`ThreadHandle`](crate::ThreadHandle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadRecord {
    pub id: ThreadId,
    /// The code the thread was started with. Identification only; the
    /// registry never invokes it.
    pub entry: ThreadEntry,
    pub name: Option<&'static str>,
}

struct Registry {
    table: Mutex<BTreeMap<ThreadId, ThreadRecord>>,
}

static REGISTRY: Once<Registry> = Once::new();

fn registry() -> &'static Registry {
    REGISTRY.call_once(|| Registry {
        table: Mutex::new(BTreeMap::new()),
    })
}

/// Creates the registry ahead of the first handle. Handles also initialize
/// it lazily, so this is a lifecycle statement more than a requirement.
pub fn init() {
    registry();
}

pub(crate) fn insert(record: ThreadRecord) -> Result<()> {
    let mut table = registry().table.lock();
    if table.contains_key(&record.id) {
        return Err(Errno::AlreadyRegistered.with_message("duplicate thread id"));
    }
    table.insert(record.id, record);
    Ok(())
}

pub(crate) fn remove(id: ThreadId) -> Option<ThreadRecord> {
    registry().table.lock().remove(&id)
}

/// Looks up the record registered under `id`, if its handle is still alive.
pub fn find(id: ThreadId) -> Option<ThreadRecord> {
    registry().table.lock().get(&id).copied()
}

pub fn contains(id: ThreadId) -> bool {
    registry().table.lock().contains_key(&id)
}
