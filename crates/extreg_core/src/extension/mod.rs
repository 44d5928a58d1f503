//! Package extension registry.
//!
//! This module defines package descriptors, their extension points and URIs,
//! and the process-wide registry that catalogs them. Loading package code at
//! runtime is out of scope; packages register declaratively.

pub mod builtin;
pub mod descriptor;
pub mod point;
pub mod registry;
pub mod uri;
