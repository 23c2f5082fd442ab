//! Path storage: an arena of path records plus two ordered collections.

use crate::path::Path;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of a path record.
pub type PathId = Uuid;

/// Which ordered collection a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Permanent,
    Temporary,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Permanent => f.write_str("permanent"),
            Collection::Temporary => f.write_str("temporary"),
        }
    }
}

/// Owns every path record.
///
/// Records live in an arena keyed by [`PathId`]; the `permanent` and
/// `temporary` sequences hold ids in insertion (render) order. A record can be
/// detached from its sequence and stay in the arena so it can be attached
/// again later (undo/redo). Detached records are dropped by
/// [`PathStore::purge_detached`].
#[derive(Debug, Clone, Default)]
pub struct PathStore {
    paths: HashMap<PathId, Path>,
    permanent: Vec<PathId>,
    temporary: Vec<PathId>,
}

impl PathStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn order(&self, collection: Collection) -> &Vec<PathId> {
        match collection {
            Collection::Permanent => &self.permanent,
            Collection::Temporary => &self.temporary,
        }
    }

    fn order_mut(&mut self, collection: Collection) -> &mut Vec<PathId> {
        match collection {
            Collection::Permanent => &mut self.permanent,
            Collection::Temporary => &mut self.temporary,
        }
    }

    /// Add a new record and append it to a collection.
    pub fn insert(&mut self, path: Path, collection: Collection) -> PathId {
        let id = path.id();
        self.paths.insert(id, path);
        self.order_mut(collection).push(id);
        id
    }

    /// Re-append an arena record to a collection.
    ///
    /// Returns false if the record no longer exists.
    pub fn attach(&mut self, id: PathId, collection: Collection) -> bool {
        if !self.paths.contains_key(&id) {
            return false;
        }
        self.order_mut(collection).push(id);
        true
    }

    /// Remove the most recent occurrence of `id` from a collection, keeping the
    /// record in the arena.
    ///
    /// Returns false if the collection did not contain it.
    pub fn detach(&mut self, id: PathId, collection: Collection) -> bool {
        let order = self.order_mut(collection);
        match order.iter().rposition(|&other| other == id) {
            Some(index) => {
                order.remove(index);
                true
            }
            None => false,
        }
    }

    /// Detach every path of a collection matching `predicate`, scanning from
    /// newest to oldest. Returns the detached ids in scan order.
    pub fn detach_where(
        &mut self,
        collection: Collection,
        mut predicate: impl FnMut(&Path) -> bool,
    ) -> Vec<PathId> {
        let Self {
            paths,
            permanent,
            temporary,
        } = self;
        let order = match collection {
            Collection::Permanent => permanent,
            Collection::Temporary => temporary,
        };

        let mut removed = Vec::new();
        for index in (0..order.len()).rev() {
            let id = order[index];
            if paths.get(&id).is_some_and(&mut predicate) {
                order.remove(index);
                removed.push(id);
            }
        }
        removed
    }

    /// Detach every path of a collection.
    pub fn detach_all(&mut self, collection: Collection) -> usize {
        let order = self.order_mut(collection);
        let count = order.len();
        order.clear();
        count
    }

    /// Drop arena records that are in neither collection and not kept by
    /// `keep`. Returns the number of records dropped.
    pub fn purge_detached(&mut self, keep: &HashSet<PathId>) -> usize {
        let attached: HashSet<PathId> = self
            .permanent
            .iter()
            .chain(self.temporary.iter())
            .copied()
            .collect();
        let before = self.paths.len();
        self.paths
            .retain(|id, _| attached.contains(id) || keep.contains(id));
        before - self.paths.len()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.permanent.clear();
        self.temporary.clear();
    }

    /// Get a record by id, attached or not.
    pub fn get(&self, id: PathId) -> Option<&Path> {
        self.paths.get(&id)
    }

    pub fn get_mut(&mut self, id: PathId) -> Option<&mut Path> {
        self.paths.get_mut(&id)
    }

    /// Whether a collection currently holds `id`.
    pub fn contains(&self, collection: Collection, id: PathId) -> bool {
        self.order(collection).contains(&id)
    }

    /// Ids of a collection in render order.
    pub fn ids(&self, collection: Collection) -> &[PathId] {
        self.order(collection)
    }

    /// Paths of a collection in render order.
    pub fn iter(&self, collection: Collection) -> impl Iterator<Item = &Path> {
        self.order(collection)
            .iter()
            .filter_map(|id| self.paths.get(id))
    }

    /// Apply `f` to every path of a collection.
    pub fn for_each_mut(&mut self, collection: Collection, mut f: impl FnMut(&mut Path)) {
        let Self {
            paths,
            permanent,
            temporary,
        } = self;
        let order = match collection {
            Collection::Permanent => permanent,
            Collection::Temporary => temporary,
        };
        for id in order.iter() {
            if let Some(path) = paths.get_mut(id) {
                f(path);
            }
        }
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.order(collection).len()
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.order(collection).is_empty()
    }

    /// Number of records in the arena, attached or not.
    pub fn record_count(&self) -> usize {
        self.paths.len()
    }
}
