//! Per network-year aggregation of availability records.
//!
//! This module folds parsed records into a running availability average and
//! a coherency level for every `(year, network)` pair, then lays both out as
//! dense network × year matrices ready for rendering.

pub mod aggregate;
pub mod coherency;
pub mod types;
pub mod utility;
