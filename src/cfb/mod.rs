//! OLE2 Compound File Binary writing module
//!
//! This module serializes a logical directory tree of storages and streams
//! into a valid compound file per the Microsoft Compound File Binary Format
//! specification (MS-CFB), version 3: 512-byte sectors, 64-byte mini
//! sectors, 4096-byte mini-stream cutoff.
//!
//! # Implementation Notes
//!
//! The sector layout is fully deterministic: DIFAT sectors (if any), FAT
//! sectors, MiniFAT sectors, directory sectors, the ministream, then large
//! stream data, in that order. The file is therefore written sequentially
//! with no seeking.

/// Constants for the CFB format
pub mod consts;

/// Sector allocation and FAT serialization
mod fat;

/// Ministream packing and MiniFAT serialization
mod minifat;

/// DIFAT serialization
mod difat;

/// Directory tree generation
mod directory;

/// CFB header generation
mod header;

/// Core CFB writer implementation
mod core;

// Re-export public types
pub use core::{CfbError, CfbWriter};
