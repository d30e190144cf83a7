//! # huelink
//!
//! An async Rust library for bridging Philips Hue lights into smart-home
//! accessory protocols.
//!
//! This crate talks to a Hue bridge over its local HTTP/JSON API and
//! re-exposes every third-party light behind it as a virtual accessory:
//! a set of typed properties, each wired as a pull/push callback pair
//! that an accessory-protocol server can drive.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use huelink::{Bridge, NativeModelMatcher, RedbStore, build_accessories};
//!
//! async fn translate() -> Result<(), Box<dyn std::error::Error>> {
//!     // Pairs with the bridge on first run (press the link button),
//!     // reuses the persisted credential afterwards.
//!     let store = RedbStore::open("huelink.redb")?;
//!     let bridge = Arc::new(Bridge::connect("192.168.1.2", &store).await?);
//!
//!     let lights = bridge.lights().await?;
//!     let accessories = build_accessories(&bridge, &lights, &NativeModelMatcher::new());
//!
//!     // Hand `accessories` to an `AccessoryHost` implementation.
//!     Ok(())
//! }
//! ```
//!
//! ## How it fits together
//!
//! - [`Authenticator`] performs the physical-confirmation pairing
//!   handshake and obtains the bridge credential.
//! - [`Bridge`] owns the credential and exposes light discovery, single
//!   light fetches and partial state updates.
//! - [`build_accessories`](accessory::build_accessories) maps each
//!   discovered light onto a capability profile and wires the
//!   bidirectional value conversions between the Hue ranges and the
//!   accessory-protocol ranges (see [`convert`]).
//! - The [`accessory::AccessoryHost`] trait is the seam towards the
//!   protocol server that actually advertises the accessories; pairing,
//!   encryption and transport are its business, not this crate's.
//!
//! Genuine Hue fixtures (model ids like `LTW012`) are excluded from
//! translation, since they already speak the target protocol natively.
//!
//! ## Reads are live
//!
//! Accessories carry no state cache. Every property read re-fetches the
//! light from the bridge, and every write is an independent HTTP round
//! trip; failed writes are logged and swallowed, failed reads degrade to
//! the property's zero value.

pub mod accessory;
mod auth;
mod bridge;
pub mod convert;
mod errors;
mod lights;
mod native;
mod response;
mod store;

// Re-export public API
pub use accessory::{
    Accessory, AccessoryHost, AccessoryInfo, CONTROLLER_ID, Capabilities, Characteristic,
    ControllerInfo, build_accessories, read_or_default,
};
pub use auth::Authenticator;
pub use bridge::Bridge;
pub use errors::Error;
pub use lights::{Light, LightKind, LightState, StateUpdate};
pub use native::NativeModelMatcher;
pub use store::{MemoryStore, RedbStore, Store, StoreError};
