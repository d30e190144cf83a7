//! HTTP client for the Hue bridge.

use std::collections::HashMap;
use std::time::Duration;

use log::debug;
use serde_json::Value;

use crate::auth::Authenticator;
use crate::errors::Error;
use crate::lights::{Light, LightName, StateUpdate};
use crate::response::{ApiResult, embedded_error};
use crate::store::Store;

type Result<T> = std::result::Result<T, Error>;

/// Client for a single Hue bridge.
///
/// Holds only immutable configuration after construction, so it can be
/// shared freely across concurrent accessory callbacks.
///
/// # Example
///
/// ```ignore
/// use huelink::{Bridge, MemoryStore};
///
/// let store = MemoryStore::new();
/// let bridge = Bridge::connect("192.168.1.2", &store).await?;
/// for light in bridge.lights().await? {
///     println!("{}: {}", light.id, light.name);
/// }
/// ```
#[derive(Debug)]
pub struct Bridge {
    address: String,
    credential: String,
    http: reqwest::Client,
}

impl Bridge {
    /// Store key under which the pairing credential is persisted.
    pub(crate) const CREDENTIAL_KEY: &'static str = "bridge_credential";

    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connect to the bridge at `address`, pairing first if the store
    /// holds no credential yet.
    ///
    /// A freshly issued credential is persisted before this returns, so
    /// later startups skip the handshake.
    pub async fn connect(address: &str, store: &dyn Store) -> Result<Self> {
        match store.get(Self::CREDENTIAL_KEY)? {
            Some(credential) => Self::with_credential(address, &credential),
            None => {
                let credential = Authenticator::new(address).run().await?;
                store.set(Self::CREDENTIAL_KEY, &credential)?;
                Self::with_credential(address, &credential)
            }
        }
    }

    /// Build a client around an already known credential.
    pub fn with_credential(address: &str, credential: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()?;

        Ok(Bridge {
            address: address.to_string(),
            credential: credential.to_string(),
            http,
        })
    }

    /// Network address of the bridge.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Query and return all lights known to the bridge.
    ///
    /// The listing endpoint only yields an id-to-name map, so every
    /// entry costs one extra fetch. The resulting order is unspecified.
    pub async fn lights(&self) -> Result<Vec<Light>> {
        let body = self
            .http
            .get(self.url("/lights"))
            .send()
            .await?
            .text()
            .await?;

        let names: HashMap<String, LightName> =
            serde_json::from_str(&body).map_err(Error::Decode)?;

        let mut lights = Vec::with_capacity(names.len());

        for (id, entry) in &names {
            debug!("fetching light {id} ({})", entry.name);
            lights.push(self.light(id).await?);
        }

        Ok(lights)
    }

    /// Query and return a single light by its id.
    ///
    /// The bridge omits the id from the light document, so it is stamped
    /// onto the decoded value here.
    pub async fn light(&self, id: &str) -> Result<Light> {
        let body = self
            .http
            .get(self.url(&format!("/lights/{id}")))
            .send()
            .await?
            .text()
            .await?;

        let mut light: Light = serde_json::from_str(&body).map_err(Error::Decode)?;
        light.id = id.to_string();

        Ok(light)
    }

    /// Apply a partial state update to the light with the given id.
    ///
    /// Only the fields set on `update` reach the wire; the bridge leaves
    /// everything else untouched. A structured error in the response
    /// surfaces as [`Error::RemoteRejected`].
    pub async fn update_state(&self, light_id: &str, update: &StateUpdate) -> Result<()> {
        if update.is_empty() {
            return Err(Error::EmptyUpdate);
        }

        let body = self
            .http
            .put(self.url(&format!("/lights/{light_id}/state")))
            .json(update)
            .send()
            .await?
            .text()
            .await?;

        let results: Vec<ApiResult<Value>> = serde_json::from_str(&body).map_err(Error::Decode)?;

        if let Some(err) = embedded_error(&results) {
            return Err(Error::rejected(&err.description));
        }

        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}/api/{}{}", self.address, self.credential, path)
    }
}
