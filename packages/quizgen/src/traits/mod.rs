//! Collaborator abstractions.
//!
//! Applications implement these to provide HTTP fetching, text generation
//! and quiz storage. The pipeline only ever talks to these traits.

pub mod fetcher;
pub mod inference;
pub mod store;
