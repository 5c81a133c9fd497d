//! # Formats Module
//!
//! On-disk format of the data file.
//!
//! File I/O lives in `store`; this module only converts between bytes and
//! a `Dataset`.

mod persistence;

pub use persistence::*;
