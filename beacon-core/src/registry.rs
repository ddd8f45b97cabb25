//! Listener storage.
//!
//! Maps event names to ordered registrations. A name whose list becomes
//! empty is removed, so every stored list is non-empty.

use crate::{context::Context, listener::Listener};
use std::collections::HashMap;

/// Stable identifier of a single registration.
pub(crate) type EntryId = u64;

/// A single registration.
#[derive(Debug)]
pub(crate) struct Entry {
    pub(crate) id: EntryId,
    pub(crate) listener: Listener,
    pub(crate) context: Context,
    pub(crate) once: bool,
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    events: HashMap<String, Vec<Entry>>,
    next_id: EntryId,
}

impl Registry {
    /// Append a registration, returning its id.
    pub(crate) fn push(
        &mut self,
        name: String,
        listener: Listener,
        context: Context,
        once: bool,
    ) -> EntryId {
        let id = self.next_id;
        self.next_id += 1;
        self.events.entry(name).or_default().push(Entry {
            id,
            listener,
            context,
            once,
        });
        id
    }

    /// Remove every registration of `listener` whose context matches
    /// `context`, handing the removed entries back to the caller.
    pub(crate) fn remove_matching(
        &mut self,
        name: &str,
        listener: &Listener,
        context: &Context,
    ) -> Vec<Entry> {
        let Some(entries) = self.events.get_mut(name) else {
            return Vec::new();
        };
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(entries)
            .into_iter()
            .partition(|entry| entry.listener.ptr_eq(listener) && entry.context.matches(context));
        *entries = kept;
        self.prune_name(name);
        removed
    }

    /// Remove a single registration by id.
    pub(crate) fn remove_entry(&mut self, name: &str, id: EntryId) -> Option<Entry> {
        let entries = self.events.get_mut(name)?;
        let position = entries.iter().position(|entry| entry.id == id)?;
        let entry = entries.remove(position);
        self.prune_name(name);
        Some(entry)
    }

    /// Snapshot of the ids registered under `name`, in call order.
    pub(crate) fn ids(&self, name: &str) -> Vec<EntryId> {
        self.events
            .get(name)
            .map(|entries| entries.iter().map(|entry| entry.id).collect())
            .unwrap_or_default()
    }

    pub(crate) fn get(&self, name: &str, id: EntryId) -> Option<&Entry> {
        self.events.get(name)?.iter().find(|entry| entry.id == id)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    pub(crate) fn len(&self, name: &str) -> usize {
        self.events.get(name).map_or(0, Vec::len)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    /// Remove every registration.
    pub(crate) fn take_all(&mut self) -> Vec<Entry> {
        std::mem::take(&mut self.events)
            .into_values()
            .flatten()
            .collect()
    }

    /// Remove every registration under `name`.
    pub(crate) fn take_name(&mut self, name: &str) -> Vec<Entry> {
        self.events.remove(name).unwrap_or_default()
    }

    fn prune_name(&mut self, name: &str) {
        if self.events.get(name).is_some_and(Vec::is_empty) {
            self.events.remove(name);
        }
    }
}
