//! # Ensemble Architecture
//!
//! Ensemble is a **UI-agnostic backend library** for a music-sharing app.
//! There is no transport layer here and none is assumed — the crate's public
//! surface is plain Rust functions returning plain Rust results, and the same
//! core could sit behind a REST API, a CLI, or a test harness unchanged.
//!
//! ## Concepts
//!
//! The domain is split into four independent *concepts*, each owning a
//! narrow slice of persistent state and a handful of guarded operations:
//!
//! - [`concepts::comments`]: resources with ordered comment lists
//! - [`concepts::tagging`]: tag registries over resources
//! - [`concepts::files`]: two-phase file uploads with signed URLs
//! - [`concepts::auth`]: username/password credential records
//!
//! Concepts never call one another. Cross-concept consistency is explicitly
//! out of scope.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Concept Layer (concepts/*.rs)                              │
//! │  - Precondition-guarded operations, pure business logic     │
//! │  - Returns Result<Payload, OpError>; errors are data        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Ports (store/, objects/, completion.rs)                    │
//! │  - DocumentStore: named collections of serde documents      │
//! │  - ObjectStore: signed URLs, existence checks, deletion     │
//! │  - TextCompletion: opaque prompt → text                     │
//! │  - Injected at construction; no ambient/global handles      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Failures Are Values
//!
//! An operation whose precondition fails returns an [`error::OpError`]
//! carrying a category and a human-readable message, with no state mutated.
//! Panics and thrown errors never cross an operation boundary; the only
//! fatal conditions are setup mistakes, which belong to whoever wires
//! production ports.
//!
//! ## Testing Strategy
//!
//! Concept logic is tested in `#[cfg(test)]` modules against the in-memory
//! ports ([`store::memory::InMemoryStore`], [`objects::memory::MemoryBucket`],
//! [`completion::CannedCompletion`]); this is where the lion's share of
//! testing lives. `tests/` holds integration tests that exercise the
//! [`store::fs::FileStore`] backend and the full upload flow end to end.
//!
//! ## Module Overview
//!
//! - [`concepts`]: the four concept implementations
//! - [`store`]: document-store port and backends
//! - [`objects`]: object-storage port and test bucket
//! - [`completion`]: text-completion port
//! - [`key`]: the storage-key codec binding the upload phases
//! - [`model`]: persisted document types
//! - [`id`]: opaque unique identifiers
//! - [`error`]: error types

pub mod completion;
pub mod concepts;
pub mod error;
pub mod id;
pub mod key;
pub mod model;
pub mod objects;
pub mod store;
