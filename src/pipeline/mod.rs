//! Incident fetch, normalization and the list derivation stages.

pub mod fetch;
pub mod filter;
pub mod normalizer;
pub mod paginate;
pub mod poller;
