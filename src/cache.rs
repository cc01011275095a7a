use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::{
    collections::BTreeMap,
    sync::Arc,
    thread::{self, ThreadId},
};

use crate::{any::Value, class::ClassId, key::BindingKey};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum CacheKey {
    Binding(BindingKey),
    /// Class provided by type, outside of its implicit binding
    Class(ClassId),
}

#[derive(Default)]
struct Slot {
    cell: OnceCell<Value>,
    /// Thread running `init` for the cell
    initializing: Mutex<Option<ThreadId>>,
}

struct Initializing<'a>(&'a Mutex<Option<ThreadId>>);

impl Drop for Initializing<'_> {
    fn drop(&mut self) {
        *self.0.lock() = None;
    }
}

/// Singleton values of one injector.
///
/// Each key owns a cell initialized at most once: concurrent first requests for the same
/// key wait for the one construction in progress.
/// The map lock is only held to fetch the cell, never while a value is constructed.
#[derive(Default)]
pub(crate) struct Cache {
    slots: Mutex<BTreeMap<CacheKey, Arc<Slot>>>,
}

impl Cache {
    #[must_use]
    pub(crate) fn get(&self, key: &CacheKey) -> Option<Value> {
        self.slots.lock().get(key).and_then(|slot| slot.cell.get().cloned())
    }

    /// Gets the cached value or initializes it with `init`.
    /// On error nothing is cached and a later call runs `init` again.
    ///
    /// If the current thread is already running `init` for `key`, returns the error of `reentered`
    /// instead of waiting for itself.
    pub(crate) fn get_or_try_init<E>(
        &self,
        key: CacheKey,
        init: impl FnOnce() -> Result<Value, E>,
        reentered: impl FnOnce() -> E,
    ) -> Result<Value, E> {
        let slot = self.slots.lock().entry(key).or_default().clone();
        if let Some(value) = slot.cell.get() {
            return Ok(value.clone());
        }

        let current = thread::current().id();
        if *slot.initializing.lock() == Some(current) {
            return Err(reentered());
        }

        slot.cell
            .get_or_try_init(|| {
                *slot.initializing.lock() = Some(current);
                let _initializing = Initializing(&slot.initializing);
                init()
            })
            .cloned()
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.slots.lock().values().filter(|slot| slot.cell.get().is_some()).count()
    }
}
