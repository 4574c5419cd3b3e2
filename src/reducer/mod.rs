// Copyright (c) 2025 - Cowboy AI, Inc.
//! Thing Event Reducer
//!
//! The top-level event-application engine: given a possibly-absent prior
//! snapshot and one event, produce the next snapshot. The persistence
//! layer owns the journal and its revision counter; it invokes [`apply`]
//! strictly sequentially per thing id, in ascending revision order, which
//! is what lets everything here be a pure, lock-free function.
//!
//! # Event Sourcing Pattern
//!
//! ```text
//! Journal → apply(prior, event, revision) → next snapshot
//!                        ↓
//!            stage bookkeeping (revision, modified, metadata)
//!                        ↓
//!            exhaustive dispatch → transition function
//! ```
//!
//! # Purity
//!
//! `apply` is a pure function of its three inputs. No wall-clock reads
//! (the event's own timestamp is only echoed), no randomness, no hidden
//! state; replaying the same journal always reconstructs a byte-identical
//! snapshot.

pub mod metadata_deriver;
mod strategies;

use tracing::debug;

use crate::domain::Thing;
use crate::errors::ApplyResult;
use crate::events::{ThingEvent, ThingEventKind};

pub use metadata_deriver::derive_metadata;

/// Apply one event to a possibly-absent prior snapshot.
///
/// # Returns
///
/// - `Ok(Some(thing))` - the next snapshot, at `next_revision`
/// - `Ok(None)` - no prior snapshot and the event is not a creation;
///   nothing can be reconstructed. This is a signal, not an error: the
///   caller decides whether a gap in its journal is fatal.
///
/// # Errors
///
/// [`ApplyError`](crate::errors::ApplyError) surfaces upstream-validation
/// defects (a merged document that no longer parses as thing content).
///
/// # Bookkeeping
///
/// Every produced snapshot, including for events with no registered
/// domain effect, carries `next_revision`, the event timestamp (when
/// present), and the event's derived metadata folded into the tree.
pub fn apply(
    prior: Option<&Thing>,
    event: &ThingEvent,
    next_revision: u64,
) -> ApplyResult<Option<Thing>> {
    let seeded = match (&event.kind, prior) {
        // Creations replace wholesale: nothing from a prior snapshot (a
        // tombstone being resurrected, say) leaks into the new thing.
        (ThingEventKind::ThingCreated { thing }, _) => thing.clone(),
        (_, Some(thing)) => thing.clone(),
        (_, None) => {
            debug!(
                tag = %event.tag(),
                "no prior snapshot and event is not a creation, nothing to reconstruct"
            );
            return Ok(None);
        }
    };

    let staged = stage(seeded, event, next_revision);
    let next = strategies::dispatch(event, staged)?;
    Ok(Some(next))
}

/// Seed the staged snapshot with revision, timestamp and metadata
/// bookkeeping before dispatch. Transitions never touch these fields.
fn stage(mut thing: Thing, event: &ThingEvent, next_revision: u64) -> Thing {
    thing.revision = next_revision;
    if let Some(timestamp) = event.timestamp {
        thing.modified = Some(timestamp);
    }
    thing.metadata.merge(derive_metadata(event, event.timestamp));
    thing
}

/// Fold a journal from nothing, assigning revisions `1..=n`.
///
/// Returns `Ok(None)` for an empty journal or one that never creates the
/// thing.
pub fn replay<'a, I>(events: I) -> ApplyResult<Option<Thing>>
where
    I: IntoIterator<Item = &'a ThingEvent>,
{
    let mut snapshot = None;
    for (index, event) in events.into_iter().enumerate() {
        snapshot = apply(snapshot.as_ref(), event, index as u64 + 1)?;
    }
    Ok(snapshot)
}
