//! # uw_core - Underworld Core Identifiers
//!
//! Zero-dependency primitives shared by every crate in the workspace:
//! - [`ItemId`]: the kind of an object (what it is)
//! - [`ObjectPos`]: the index of an object record in an inventory pool (where it is)
//!
//! Both are plain 16-bit values on disk. The reserved value `0xffff` means
//! "no item" for an [`ItemId`] and "no slot" for an [`ObjectPos`].

#![cfg_attr(not(feature = "std"), no_std)]

pub mod id;

pub use id::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::id::{ItemId, ObjectPos};
}
