//! Deterministic event-application engine for digital-twin things
//!
//! A thing's durable record is an ordered journal of domain events; its
//! current state is never stored directly but reconstructed by folding
//! that journal onto a base snapshot. This crate is the fold: a pure
//! [`reducer::apply`] that takes a possibly-absent prior snapshot, one
//! event, and the next revision number, and returns the next snapshot.
//!
//! The persistence layer around it (journal storage, snapshotting,
//! actor lifecycle, transports) is an external collaborator: it
//! guarantees per-thing sequential, revision-ordered delivery, and this
//! engine guarantees a deterministic, I/O-free reduction in return.
//!
//! ```rust
//! use serde_json::json;
//! use twin_reducer::domain::{FieldPath, Thing, ThingId};
//! use twin_reducer::events::{ThingEvent, ThingEventKind};
//! use twin_reducer::reducer;
//!
//! let created = ThingEvent::new(ThingEventKind::ThingCreated {
//!     thing: Thing::new(ThingId::new("org.example:bulb")),
//! });
//! let painted = ThingEvent::new(ThingEventKind::AttributeCreated {
//!     path: FieldPath::parse("color").unwrap(),
//!     value: json!("red"),
//! });
//!
//! let thing = reducer::replay(&[created, painted]).unwrap().unwrap();
//! assert_eq!(thing.revision, 2);
//! ```

pub mod domain;
pub mod errors;
pub mod events;
pub mod json_merge;
pub mod reducer;

// Re-export commonly used types
pub use domain::{
    Feature, Features, FieldPath, FieldPathError, JsonObject, Lifecycle, MetadataTree, PolicyId,
    Thing, ThingId,
};
pub use errors::{ApplyError, ApplyResult};
pub use events::{EventHeaders, ThingEvent, ThingEventKind};
pub use reducer::{apply, replay};
