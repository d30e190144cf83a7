//! Pairing handshake against the Hue bridge.
//!
//! A fresh credential can only be issued while a physical button on the
//! bridge is pressed, so the handshake keeps knocking at a fixed
//! interval until the bridge accepts or the attempt budget runs out.

use std::time::Duration;

use log::{debug, info};
use rand::RngCore;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::Error;
use crate::response::{ApiResult, PairingSuccess, embedded_error};

type Result<T> = std::result::Result<T, Error>;

/// Application name announced to the bridge during pairing.
const APP_NAME: &str = "huelink";

#[derive(Debug, Serialize)]
struct PairingRequest<'a> {
    #[serde(rename = "devicetype")]
    device_type: &'a str,
}

/// One-shot pairing protocol that obtains a credential from the bridge.
///
/// # Example
///
/// ```ignore
/// use huelink::Authenticator;
///
/// let credential = Authenticator::new("192.168.1.2").run().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Authenticator {
    address: String,
    attempts: u32,
    interval: Duration,
}

impl Authenticator {
    /// Attempt budget: one knock per second for half a minute, roughly
    /// the time a user needs to walk over and press the button.
    pub const DEFAULT_ATTEMPTS: u32 = 30;
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(address: &str) -> Self {
        Authenticator {
            address: address.to_string(),
            attempts: Self::DEFAULT_ATTEMPTS,
            interval: Self::DEFAULT_INTERVAL,
        }
    }

    /// Override the attempt budget.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Override the delay between attempts.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run the handshake until the bridge issues a credential.
    ///
    /// Fails with [`Error::AuthTimeout`] once the attempt budget is
    /// exhausted without a confirmation.
    pub async fn run(&self) -> Result<String> {
        let http = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()?;
        let device_type = device_type_label();

        info!("press the link button on the Hue bridge to confirm pairing");

        for attempt in 1..=self.attempts {
            match self.pair(&http, &device_type).await {
                Ok(credential) => {
                    debug!("pairing confirmed on attempt {attempt}");
                    return Ok(credential);
                }
                Err(err) => {
                    debug!("pairing attempt {attempt}/{}: {err}", self.attempts);
                }
            }

            if attempt < self.attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        Err(Error::AuthTimeout {
            attempts: self.attempts,
        })
    }

    /// Send a single pairing request and extract the issued credential.
    async fn pair(&self, http: &reqwest::Client, device_type: &str) -> Result<String> {
        let body = http
            .post(format!("http://{}/api", self.address))
            .json(&PairingRequest { device_type })
            .send()
            .await?
            .text()
            .await?;

        let results: Vec<ApiResult<PairingSuccess>> =
            serde_json::from_str(&body).map_err(Error::Decode)?;

        // A populated success object wins even when the bridge also
        // reports errors in the same array.
        for result in &results {
            if let Some(success) = &result.success {
                return Ok(success.username.clone());
            }
        }

        match embedded_error(&results) {
            Some(err) => {
                debug!(
                    "bridge reported error {} at {:?}: {}",
                    err.code, err.address, err.description
                );
                Err(Error::rejected(&err.description))
            }
            None => Err(Error::rejected("pairing response contained no result")),
        }
    }
}

/// Build a locally unique device label for the pairing request.
///
/// A random 16 byte seed is hashed and a truncated prefix of the digest
/// is hex-encoded, giving the bridge a stable-looking identity without
/// leaking anything about the host.
fn device_type_label() -> String {
    let mut seed = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut seed);
    let digest = Sha256::digest(seed);
    format!("{}#{}", APP_NAME, hex::encode(&digest[..10]))
}
