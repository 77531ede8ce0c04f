//! # Tasklet Module
//!
//! Single-shot file operations that run after the record pipeline.

pub mod swap;
