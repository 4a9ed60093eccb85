use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::models::Resolution;

/// Local mirror of the numbering resolutions.
pub trait ResolutionStore: Send + Sync {
    fn next_id(&self) -> i64;
    fn get(&self, id: i64) -> Option<Resolution>;
    fn upsert(&self, resolution: Resolution);
    fn remove(&self, id: i64) -> Option<Resolution>;
    /// Ordered by local id.
    fn list(&self) -> Vec<Resolution>;
    fn find_by_remote_id(&self, resolution_id: i64) -> Option<Resolution>;
    /// Stores `resolution` unless its remote id is already mirrored.
    /// Returns false when nothing was written.
    fn insert_if_absent_by_remote_id(&self, resolution: Resolution) -> bool;
}

#[derive(Default)]
pub struct InMemoryResolutionStore {
    resolutions: DashMap<i64, Resolution>,
    /// API resolution id -> local id.
    remote_ids: DashMap<i64, i64>,
    last_id: AtomicI64,
}

impl InMemoryResolutionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResolutionStore for InMemoryResolutionStore {
    fn next_id(&self) -> i64 {
        self.last_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn get(&self, id: i64) -> Option<Resolution> {
        self.resolutions.get(&id).map(|entry| entry.value().clone())
    }

    fn upsert(&self, resolution: Resolution) {
        self.last_id.fetch_max(resolution.id, Ordering::SeqCst);
        if let Some(remote_id) = resolution.resolution_id {
            self.remote_ids.insert(remote_id, resolution.id);
        }
        self.resolutions.insert(resolution.id, resolution);
    }

    fn remove(&self, id: i64) -> Option<Resolution> {
        let (_, resolution) = self.resolutions.remove(&id)?;
        if let Some(remote_id) = resolution.resolution_id {
            self.remote_ids.remove_if(&remote_id, |_, local_id| *local_id == id);
        }
        Some(resolution)
    }

    fn list(&self) -> Vec<Resolution> {
        let mut resolutions: Vec<Resolution> = self
            .resolutions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        resolutions.sort_by_key(|r| r.id);
        resolutions
    }

    fn find_by_remote_id(&self, resolution_id: i64) -> Option<Resolution> {
        let local_id = *self.remote_ids.get(&resolution_id)?;
        self.get(local_id)
    }

    fn insert_if_absent_by_remote_id(&self, resolution: Resolution) -> bool {
        let Some(remote_id) = resolution.resolution_id else {
            self.upsert(resolution);
            return true;
        };
        match self.remote_ids.entry(remote_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                self.last_id.fetch_max(resolution.id, Ordering::SeqCst);
                let local_id = resolution.id;
                self.resolutions.insert(local_id, resolution);
                slot.insert(local_id);
                true
            }
        }
    }
}
