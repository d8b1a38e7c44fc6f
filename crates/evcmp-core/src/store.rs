//! Event store adapter: events, named products, and typed collections.
//!
//! The comparison engine only depends on the [`EventSource`] trait. The
//! in-memory [`EventStore`] is the concrete adapter used by the CLI; it is
//! built from already-decoded [`EventFile`]s so that this crate never touches
//! the filesystem.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event_file::EventFile;
use crate::record::{CoreFields, Record, RecordRef};

// ---------------------------------------------------------------------------
// Collection / Product
// ---------------------------------------------------------------------------

/// An ordered, fixed-size sequence of records for one event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Collection {
    pub records: Vec<Record>,
}

impl Collection {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl FromIterator<Record> for Collection {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// A named entry of an event.
///
/// Only [`Product::Collection`] values take part in a comparison; summary
/// objects (run metadata, event info) are carried along but skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Product {
    /// A typed record collection.
    Collection(Collection),
    /// Any non-collection object.
    Summary { value: serde_json::Value },
}

impl Product {
    /// Returns the collection if this product is one.
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(c) => Some(c),
            Self::Summary { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// All products of one event, keyed by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event {
    pub products: BTreeMap<String, Product>,
}

impl Event {
    /// Looks up a product by name.
    pub fn get(&self, name: &str) -> Option<&Product> {
        self.products.get(name)
    }

    /// Looks up a product by name and returns it only if it is a collection.
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.get(name).and_then(Product::as_collection)
    }

    /// Dereferences a [`RecordRef`] to the core block of the target record.
    ///
    /// Returns `None` if the collection is missing, the index is out of range,
    /// or the target record has no core capability.
    pub fn resolve(&self, target: &RecordRef) -> Option<&CoreFields> {
        self.collection(&target.collection)?
            .get(target.index)?
            .core
            .as_ref()
    }

    /// Inserts a collection under `name`, replacing any previous product.
    pub fn insert_collection(&mut self, name: impl Into<String>, collection: Collection) {
        self.products
            .insert(name.into(), Product::Collection(collection));
    }

    /// Builder-style variant of [`Event::insert_collection`].
    #[must_use]
    pub fn with_collection(mut self, name: impl Into<String>, collection: Collection) -> Self {
        self.insert_collection(name, collection);
        self
    }
}

// ---------------------------------------------------------------------------
// EventSource
// ---------------------------------------------------------------------------

/// Indexed access to the events of one input.
///
/// Implementations must return the same records in the same order on
/// repeated access.
pub trait EventSource {
    /// Number of events available.
    fn len(&self) -> usize;

    /// Returns the event at `index`, or `None` if out of range.
    fn event(&self, index: usize) -> Option<&Event>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory [`EventSource`] backed by decoded event files.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Concatenates the events of `files` in the given order.
    pub fn from_files(files: impl IntoIterator<Item = EventFile>) -> Self {
        Self {
            events: files.into_iter().flat_map(|f| f.events).collect(),
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }
}

impl EventSource for EventStore {
    fn len(&self) -> usize {
        self.events.len()
    }

    fn event(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }
}

impl From<Vec<Event>> for EventStore {
    fn from(events: Vec<Event>) -> Self {
        Self::new(events)
    }
}
