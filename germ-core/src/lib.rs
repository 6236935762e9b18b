//! Core models for working with genomic intervals.
//!
//! This crate defines the [`Interval`](models::Interval) contract that every
//! interval-shaped record has to satisfy before it can be indexed, the two concrete
//! interval types used throughout germ ([`Locus`](models::Locus) and
//! [`Annotated`](models::Annotated)), and small utilities to read region files.
//!
//! Coordinates are 1-based and closed on both ends: `chr1:100-200` covers 101 bases
//! and a single position is written with `start == stop`.
//!
//! ```rust
//! use germ_core::models::{Interval, Locus};
//!
//! let exon = Locus::new("chr1", 100, 200).unwrap();
//! let snv = Locus::point("chr1", 150).unwrap();
//!
//! assert!(exon.overlaps(&snv));
//! assert_eq!(exon.size(), 101);
//! assert_eq!(exon.range(), "1:100-200");
//! ```

pub mod errors;
pub mod models;
pub mod utils;

pub use self::errors::IntervalError;
