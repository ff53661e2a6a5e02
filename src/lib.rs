//! Versioned, content-addressed store for hierarchical course structures.
//!
//! A course is a DAG of typed blocks; every historical revision of its
//! structure is preserved, and named branches (`draft`, `published`, ...)
//! advance independently. This crate is the persistence and versioning
//! engine: the three-layer data model (`CourseIndex` → `Structure` →
//! `Definition`), branch-head pointers, copy-on-write structure
//! versioning, optimistic concurrency against a branch head, cross-branch
//! publish with orphan reclamation, and a per-request descriptor cache
//! with inheritance propagation.
//!
//! The block-class registry, the document-store driver backing it, and
//! the opaque locator parser are treated as external collaborators; see
//! [scope], [store], and [locator] for the narrow interfaces this crate
//! consumes from them.

#[macro_use]
mod error;

pub mod cache;
pub mod config;
pub mod definition_store;
pub mod history;
pub mod index_store;
pub mod inheritance;
pub mod keys;
pub mod locator;
pub mod model;
pub mod publish;
pub mod scope;
pub mod store;
pub mod structure_store;
pub mod versioning;

pub use error::{Error, Result};
