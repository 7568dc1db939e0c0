//! Registry of in-flight loads and their abort tokens.
//!
//! Each load is registered with the document it was issued against, so a
//! host can cancel everything pending for a document it is closing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::model::DocumentId;

#[derive(Default)]
pub struct LoadControl {
    next_id: AtomicU64,
    loads: RwLock<HashMap<u64, (DocumentId, Arc<AtomicBool>)>>,
}

impl LoadControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a load; returns its id and the abort token the load checks
    /// before touching the document.
    pub fn register(&self, document: DocumentId) -> (u64, Arc<AtomicBool>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let token = Arc::new(AtomicBool::new(false));
        self.loads
            .write()
            .unwrap()
            .insert(id, (document, Arc::clone(&token)));
        (id, token)
    }

    /// Call when the load finishes, whatever the outcome.
    pub fn unregister(&self, id: u64) {
        self.loads.write().unwrap().remove(&id);
    }

    /// Sets the abort token of every load issued against `document`.
    /// Returns how many were cancelled.
    pub fn cancel_for_document(&self, document: DocumentId) -> usize {
        let loads = self.loads.read().unwrap();
        let mut n = 0;
        for (doc, token) in loads.values() {
            if *doc == document {
                token.store(true, Ordering::Relaxed);
                n += 1;
            }
        }
        n
    }

    pub fn cancel_all(&self) -> usize {
        let loads = self.loads.read().unwrap();
        for (_, token) in loads.values() {
            token.store(true, Ordering::Relaxed);
        }
        loads.len()
    }

    pub fn pending(&self) -> usize {
        self.loads.read().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_only_matching_document() {
        let control = LoadControl::new();
        let (_, a) = control.register(DocumentId(1));
        let (_, b) = control.register(DocumentId(2));
        let (_, c) = control.register(DocumentId(1));
        assert_eq!(control.cancel_for_document(DocumentId(1)), 2);
        assert!(a.load(Ordering::Relaxed));
        assert!(!b.load(Ordering::Relaxed));
        assert!(c.load(Ordering::Relaxed));
    }

    #[test]
    fn unregister_removes() {
        let control = LoadControl::new();
        let (id, token) = control.register(DocumentId(7));
        assert_eq!(control.pending(), 1);
        control.unregister(id);
        assert_eq!(control.pending(), 0);
        assert_eq!(control.cancel_for_document(DocumentId(7)), 0);
        assert!(!token.load(Ordering::Relaxed));
    }

    #[test]
    fn ids_are_distinct() {
        let control = LoadControl::new();
        let (a, _) = control.register(DocumentId(1));
        let (b, _) = control.register(DocumentId(1));
        assert_ne!(a, b);
        assert_eq!(control.cancel_all(), 2);
    }
}
