use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-flight guard for per-row actions.
///
/// `begin` hands out at most one permit per id. The permit releases its id
/// on drop, whether the action succeeded or failed, so a second invocation
/// for the same row while one is outstanding gets `None` instead of
/// double-submitting the request.
#[derive(Debug, Clone, Default)]
pub struct ActionGate {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl ActionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, id: &str) -> Option<ActionPermit> {
        let mut in_flight = self.lock();
        if !in_flight.insert(id.to_string()) {
            return None;
        }
        Some(ActionPermit {
            gate: Arc::clone(&self.in_flight),
            id: id.to_string(),
        })
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // A poisoned lock only means a holder panicked; the set is still
        // coherent because every mutation is a single insert or remove.
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Held for the duration of one action on one row.
#[derive(Debug)]
pub struct ActionPermit {
    gate: Arc<Mutex<HashSet<String>>>,
    id: String,
}

impl Drop for ActionPermit {
    fn drop(&mut self) {
        self.gate
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.id);
    }
}
