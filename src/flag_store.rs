//! A thread-safe in-memory storage for the current set of flags. [`FlagStore`] provides
//! concurrent access for readers (flag evaluation) and a writer (the transport applying the
//! bootstrap snapshot and pushed events).
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use arc_swap::ArcSwap;

use crate::{Flag, FlagActivation, FlagEvent, FlagTitle};

type Flags = HashMap<String, Arc<Flag>>;

/// `FlagStore` holds flags keyed by title and allows lock-free reads while being updated.
///
/// The mapping itself is never modified in place: every mutation builds a new mapping and
/// publishes it with a single atomic swap, so a reader sees either the complete old mapping or
/// the complete new one. Flags are handed out as `Arc<Flag>` and stay valid after the store moves
/// on.
///
/// Mutations are serialized internally, but the store applies them in the order it is called.
/// Events must be fed from a single ordered stream; the store does not reorder or deduplicate
/// them.
pub struct FlagStore {
    flags: ArcSwap<Flags>,
    // Held by writers for the whole copy-modify-publish cycle.
    write_lock: Mutex<()>,
}

impl Default for FlagStore {
    fn default() -> Self {
        FlagStore::new()
    }
}

impl FlagStore {
    /// Create a new empty flag store.
    pub fn new() -> Self {
        FlagStore {
            flags: ArcSwap::from_pointee(HashMap::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Get the flag with the given title. Never blocks on a concurrent mutation.
    pub fn get(&self, title: &str) -> Option<Arc<Flag>> {
        self.flags.load().get(title).cloned()
    }

    /// Get the complete current mapping from title to flag.
    pub fn snapshot(&self) -> Arc<HashMap<String, Arc<Flag>>> {
        self.flags.load_full()
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.flags.load().len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.flags.load().is_empty()
    }

    /// Titles of all stored flags, in no particular order.
    pub fn titles(&self) -> Vec<String> {
        self.flags.load().keys().cloned().collect()
    }

    /// Replace all flags. Used to bootstrap the store and to resynchronize after a reconnect.
    ///
    /// If several flags share a title, the last one wins.
    pub fn replace_all(&self, flags: impl IntoIterator<Item = Flag>) {
        // Constructing new value before requesting the lock to minimize lock span.
        let new_flags: Flags = flags
            .into_iter()
            .map(|flag| (flag.title.clone(), Arc::new(flag)))
            .collect();
        let count = new_flags.len();

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.flags.store(Arc::new(new_flags));

        log::debug!(target: "lightswitch", count; "replaced all flags");
    }

    /// Insert a flag, or overwrite the flag with the same title. Returns the previous flag.
    pub fn upsert(&self, flag: Flag) -> Option<Arc<Flag>> {
        let flag = Arc::new(flag);
        let previous = self.update(|flags| flags.insert(flag.title.clone(), flag.clone()));

        log::debug!(target: "lightswitch",
                    title = flag.title.as_str(),
                    version = flag.version,
                    replaced = previous.is_some();
                    "upserted flag");
        previous
    }

    /// Remove the flag with the given title, if present. Returns the removed flag.
    pub fn remove(&self, title: &str) -> Option<Arc<Flag>> {
        let removed = self.update(|flags| flags.remove(title));

        log::debug!(target: "lightswitch",
                    title,
                    found = removed.is_some();
                    "removed flag");
        removed
    }

    /// Switch the flag with the given title on or off, keeping the rest of its definition.
    ///
    /// Returns `false` if there is no such flag.
    pub fn set_active(&self, title: &str, active: bool) -> bool {
        let found = self.update(|flags| match flags.get_mut(title) {
            Some(flag) => {
                *flag = Arc::new(flag.with_active(active));
                true
            }
            None => false,
        });

        log::debug!(target: "lightswitch", title, active, found; "switched flag");
        found
    }

    /// Apply an event pushed by the management service.
    pub fn apply_event(&self, event: FlagEvent) {
        match event {
            FlagEvent::Create(flag) | FlagEvent::Update(flag) => {
                self.upsert(flag);
            }
            FlagEvent::Delete(FlagTitle { title }) => {
                self.remove(&title);
            }
            FlagEvent::Switch(FlagActivation { title, active }) => {
                self.set_active(&title, active);
            }
        }
    }

    /// Copy the current mapping, modify the copy, and publish it.
    fn update<R>(&self, f: impl FnOnce(&mut Flags) -> R) -> R {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut flags = Flags::clone(&self.flags.load());
        let result = f(&mut flags);
        self.flags.store(Arc::new(flags));
        result
    }
}
