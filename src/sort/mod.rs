//! Sort scoring.
//!
//! A [`SortDescriptor`] turns one numeric attribute into a per-record
//! score. Selection slots sum the scores of all their descriptors.

pub mod scorer;

pub use scorer::{score, SortDescriptor, SortDirection};
