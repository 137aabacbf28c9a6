//! Process-wide registry of live [`Debugger`] instances (spec.md §9
//! "Global debugger list and settings").
//!
//! Grounded on `isgasho-rd`'s `lazy_static`-backed global session table:
//! a single process-wide table with an explicit `init`/`shutdown`
//! lifecycle rather than letting a `Debugger` construct itself into
//! some ambient global on first use.

use std::collections::HashMap;
use std::sync::Mutex;

use lazy_static::lazy_static;

use crate::error::{DebugError, Result};

/// Opaque handle returned by [`register`], used to [`unregister`] the
/// same entry later.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RegistryId(u64);

struct Registry {
    initialized: bool,
    next_id: u64,
    entries: HashMap<u64, String>,
}

impl Registry {
    fn new() -> Self {
        Registry {
            initialized: false,
            next_id: 1,
            entries: HashMap::new(),
        }
    }
}

lazy_static! {
    static ref REGISTRY: Mutex<Registry> = Mutex::new(Registry::new());
}

/// Open the registry. Must be called once before the first `Debugger`
/// is constructed; calling it again is an error rather than a silent
/// no-op, since a second `init` almost always indicates a lifecycle
/// bug in the caller.
pub fn init() -> Result<()> {
    let mut registry = REGISTRY.lock().unwrap();
    if registry.initialized {
        return Err(DebugError::invalid_state("registry already initialized"));
    }
    registry.initialized = true;
    Ok(())
}

/// Close the registry. Errors if any entry is still registered, so a
/// `Debugger` that was never torn down shows up as a loud failure
/// instead of a silently-leaked handle.
pub fn shutdown() -> Result<()> {
    let mut registry = REGISTRY.lock().unwrap();
    if !registry.initialized {
        return Err(DebugError::invalid_state("registry not initialized"));
    }
    if !registry.entries.is_empty() {
        return Err(DebugError::invalid_state(format!(
            "{} debugger(s) still registered at shutdown",
            registry.entries.len()
        )));
    }
    registry.initialized = false;
    Ok(())
}

/// Record a live debugger under `label` (typically the executable path
/// or attach target), returning a handle to remove it later.
pub fn register(label: impl Into<String>) -> Result<RegistryId> {
    let mut registry = REGISTRY.lock().unwrap();
    if !registry.initialized {
        return Err(DebugError::invalid_state("registry not initialized"));
    }
    let id = registry.next_id;
    registry.next_id += 1;
    registry.entries.insert(id, label.into());
    Ok(RegistryId(id))
}

/// Remove a previously [`register`]ed entry. Removing an id twice (or
/// one that was never registered) is a no-op, since the caller most
/// likely raced its own teardown path rather than corrupted state.
pub fn unregister(id: RegistryId) {
    let mut registry = REGISTRY.lock().unwrap();
    registry.entries.remove(&id.0);
}

/// Number of debuggers currently registered.
pub fn live_count() -> usize {
    REGISTRY.lock().unwrap().entries.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;

    // The registry is a process-wide singleton; route every test
    // through a single init/shutdown pair so they don't race the
    // "already initialized" check against each other.
    static INIT: Once = Once::new();

    fn with_registry<F: FnOnce()>(f: F) {
        INIT.call_once(|| {
            init().unwrap();
        });
        f();
    }

    #[test]
    fn register_and_unregister_round_trips() {
        with_registry(|| {
            let before = live_count();
            let id = register("/bin/true").unwrap();
            assert_eq!(live_count(), before + 1);
            unregister(id);
            assert_eq!(live_count(), before);
        });
    }

    #[test]
    fn unregistering_twice_is_harmless() {
        with_registry(|| {
            let id = register("/bin/false").unwrap();
            unregister(id);
            unregister(id);
        });
    }
}
