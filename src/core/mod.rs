//! # Core Packet Components
//!
//! The Data packet aggregate and the sub-objects it is composed of.
//!
//! ## Components
//! - **Blob / SignedBlob**: immutable byte buffers, the latter annotated with
//!   the signed byte range
//! - **ChangeCounter**: versioned wrapper that notices replacement and
//!   internal mutation of a sub-object
//! - **Name, MetaInfo, KeyLocator, Signature**: the mutable sub-objects
//! - **Data**: the packet aggregate and its default wire encoding cache
//!
//! ## Change Tracking
//! Sub-objects count their own mutations. The aggregate polls them on every
//! read of the cached encoding instead of being notified, so any mutation made
//! through `*_mut()` accessors is picked up before the cache is trusted.

pub mod blob;
pub mod change_counter;
pub mod data;
pub mod key_locator;
pub mod meta_info;
pub mod name;
pub mod signature;
