// Copyright (c) 2025 - Cowboy AI, Inc.
//! Thing Domain Events
//!
//! This module defines the event model for the thing bounded context.
//! Events are immutable facts representing state changes that have
//! occurred; the reducer folds them into snapshots.
//!
//! # Event Sourcing Principles
//!
//! 1. **Events are immutable**: Once written to the journal, events never change
//! 2. **Events are past tense**: Named for what happened (Created, not Create)
//! 3. **Events carry context in headers**: correlation id and the reserved
//!    `ditto-metadata:` provenance namespace travel in the header map
//! 4. **Events are tagged**: an adjacent `"type"` discriminant keys dispatch
//!    and keeps journals readable across versions
//!
//! # Module Organization
//!
//! - [`thing_event`] - the closed event sum and its envelope
//! - [`headers`] - the header map and reserved key namespaces

pub mod headers;
pub mod thing_event;

// Re-export commonly used types
pub use headers::{
    EventHeaders, CORRELATION_ID_HEADER, ISSUED_AT_KEY, METADATA_HEADER_PREFIX,
};
pub use thing_event::{ThingEvent, ThingEventKind, KNOWN_EVENT_TAGS};
