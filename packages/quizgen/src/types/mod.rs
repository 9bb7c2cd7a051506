//! Domain types for the quiz pipeline.

pub mod config;
pub mod document;
pub mod quiz;
