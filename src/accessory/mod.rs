//! Accessory-facing data model.
//!
//! Each Hue light is exposed as one [`Accessory`] whose properties are
//! wired as pull/push callback pairs. The protocol server that actually
//! advertises the accessories (pairing, encryption, transport) lives
//! outside this crate behind the [`AccessoryHost`] trait; this module
//! only defines what such a host consumes.

mod factory;

pub use factory::{Capabilities, build_accessories, capabilities};

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use log::{debug, error};

use crate::errors::Error;

/// Identity reserved for the bridge controller itself; accessory ids
/// start above it.
pub const CONTROLLER_ID: u64 = 1;

type PullFn<T> = Box<dyn Fn() -> BoxFuture<'static, T> + Send + Sync>;
type PushFn<T> = Box<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

/// One exposed property of an accessory.
///
/// `pull` always re-fetches the value from the device; there is no
/// local cache to invalidate. `push` forwards a remote write and never
/// reports failure to the caller, since the consuming protocol has no
/// error channel for property access.
pub struct Characteristic<T> {
    pull: PullFn<T>,
    push: PushFn<T>,
}

impl<T> Characteristic<T> {
    pub fn new(
        pull: impl Fn() -> BoxFuture<'static, T> + Send + Sync + 'static,
        push: impl Fn(T) -> BoxFuture<'static, ()> + Send + Sync + 'static,
    ) -> Self {
        Characteristic {
            pull: Box::new(pull),
            push: Box::new(push),
        }
    }

    /// Fetch the current value from the device.
    pub async fn pull(&self) -> T {
        (self.pull)().await
    }

    /// Forward a remote write to the device.
    pub async fn push(&self, value: T) {
        (self.push)(value).await
    }
}

impl<T> fmt::Debug for Characteristic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Characteristic")
    }
}

/// Static description of an accessory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInfo {
    pub id: u64,
    pub name: String,
    pub model: String,
    pub manufacturer: String,
    pub firmware_version: String,
}

/// A virtual accessory standing in for one Hue light.
///
/// Which optional characteristics are present depends on the light's
/// capability profile; power is always wired.
#[derive(Debug)]
pub struct Accessory {
    pub info: AccessoryInfo,
    pub power: Characteristic<bool>,
    pub brightness: Option<Characteristic<u8>>,
    pub color_temperature: Option<Characteristic<u16>>,
    pub hue: Option<Characteristic<f32>>,
    pub saturation: Option<Characteristic<f32>>,
}

/// Identity the accessory host advertises for the controller itself.
#[derive(Debug, Clone)]
pub struct ControllerInfo {
    pub name: String,
    pub pin: String,
}

/// Seam for the external accessory-protocol server.
///
/// Implementations own pairing, encryption and transport. This crate
/// only hands over the controller identity plus the accessory set and
/// expects `serve` to run until the process is asked to terminate.
pub trait AccessoryHost {
    /// Register the controller identity and the accessories to expose.
    fn register(&mut self, controller: ControllerInfo, accessories: Vec<Accessory>);

    /// Serve until a termination signal arrives.
    fn serve(&mut self) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Default-on-error policy for read callbacks.
///
/// The consuming protocol has no error channel for property reads, so a
/// failed fetch degrades to the type's zero value instead of
/// propagating.
pub fn read_or_default<T: Default>(
    result: Result<T, Error>,
    light_id: &str,
    property: &str,
) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            debug!("light {light_id}: falling back to default for {property}: {err}");
            T::default()
        }
    }
}

/// Log-and-swallow policy for write callbacks.
pub(crate) fn log_update_outcome<V: fmt::Display>(
    result: Result<(), Error>,
    light_id: &str,
    name: &str,
    property: &str,
    value: V,
) {
    if let Err(err) = result {
        error!("light {light_id} ({name}): failed to set {property} to {value}: {err}");
    }
}
