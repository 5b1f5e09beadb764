//! # ndn-data
//!
//! Named-data networking Data packets: a hierarchical [`Name`], descriptive
//! [`MetaInfo`], a [`Signature`] and an opaque content [`Blob`].
//!
//! The packet keeps a cached wire encoding that is invalidated whenever any
//! part of it changes. Encoding and decoding go through a pluggable
//! [`WireFormat`]; both record the byte range covered by the signature so
//! signing and verification never re-parse the encoding.
//!
//! ## Modules
//! - [`core`]: Data packet aggregate and its sub-objects
//! - [`encoding`]: wire format trait, NDN-TLV and serde-based codecs
//! - [`security`]: signing and verification over the signed region
//! - [`config`]: TOML/env configuration and codec composition
//! - [`utils`]: logging setup
//!
//! ## Example
//! ```rust
//! use ndn_data::{Data, Name};
//!
//! # fn main() -> ndn_data::error::Result<()> {
//! let mut data = Data::new(Name::from_uri("/example/hello")?);
//! data.set_content("payload");
//!
//! let encoding = data.wire_encode()?;
//! let mut decoded = Data::default();
//! decoded.wire_decode(encoding.blob().clone())?;
//! assert_eq!(decoded, data);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//! A `Data` is owned by one thread at a time. It is `Send` but not `Sync`;
//! callers that share one across threads must serialize access themselves.

pub mod config;
pub mod core;
pub mod encoding;
pub mod error;
pub mod security;
pub mod utils;

pub use crate::core::blob::{Blob, SignedBlob};
pub use crate::core::change_counter::{ChangeCount, ChangeCounter};
pub use crate::core::data::{ContentObject, Data};
pub use crate::core::key_locator::{KeyLocator, KeyLocatorType};
pub use crate::core::meta_info::{ContentType, MetaInfo};
pub use crate::core::name::{Component, Name};
pub use crate::core::signature::{Signature, SignatureType};
pub use crate::encoding::{default_wire_format, WireFormat};
pub use crate::error::{PacketError, Result};
