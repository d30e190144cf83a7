//! Unattended bridge daemon.
//!
//! Wires the whole translation pipeline together: persistent credential
//! store, pairing, light discovery and accessory creation, then serves
//! through a stand-in host that polls the accessories until Ctrl+C.
//!
//! Replace [`PollingHost`] with a real accessory-protocol server to
//! expose the lights to a smart-home controller.
//!
//! Run with: cargo run --example hue_daemon -- --bridge-address 192.168.1.2

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use huelink::{
    Accessory, AccessoryHost, Bridge, ControllerInfo, NativeModelMatcher, RedbStore,
    build_accessories,
};

#[derive(Parser)]
#[command(name = "hue-daemon")]
#[command(about = "Expose third-party Hue lights as smart-home accessories", long_about = None)]
struct Cli {
    /// Network address of the Hue bridge (host or host:port)
    #[arg(short, long)]
    bridge_address: String,

    /// Directory for the persistent credential store
    #[arg(short, long, default_value = "./huelink_data")]
    data_dir: PathBuf,

    /// Pairing PIN advertised by the accessory host
    #[arg(short, long, default_value = "031-45-154")]
    pin: String,

    /// Poll interval of the stand-in host, in seconds
    #[arg(long, default_value = "30")]
    poll_interval: u64,
}

/// Minimal [`AccessoryHost`]: instead of speaking a real accessory
/// protocol it periodically pulls every power characteristic and prints
/// the result, which exercises the live-read path end to end.
#[derive(Default)]
struct PollingHost {
    controller: Option<ControllerInfo>,
    accessories: Vec<Accessory>,
    poll_interval: Duration,
}

impl AccessoryHost for PollingHost {
    fn register(&mut self, controller: ControllerInfo, accessories: Vec<Accessory>) {
        self.controller = Some(controller);
        self.accessories = accessories;
    }

    async fn serve(&mut self) -> Result<(), huelink::Error> {
        if let Some(controller) = &self.controller {
            println!(
                "serving {} accessories as '{}' (pin {})",
                self.accessories.len(),
                controller.name,
                controller.pin
            );
        }

        let mut ticker = tokio::time::interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    println!("\nshutting down");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    for accessory in &self.accessories {
                        let on = accessory.power.pull().await;
                        println!(
                            "[{}] {}: {}",
                            accessory.info.id,
                            accessory.info.name,
                            if on { "on" } else { "off" }
                        );
                    }
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.data_dir)?;
    let store = RedbStore::open(cli.data_dir.join("huelink.redb"))?;

    println!("connecting to Hue bridge at {}...", cli.bridge_address);
    let bridge = Arc::new(Bridge::connect(&cli.bridge_address, &store).await?);

    let lights = bridge.lights().await?;
    println!("discovered {} lights:", lights.len());
    for light in &lights {
        println!(
            "  {} - {} ({}, model {}, firmware {})",
            light.id, light.name, light.light_type, light.model_id, light.software_version
        );
    }

    let matcher = NativeModelMatcher::new();
    let accessories = build_accessories(&bridge, &lights, &matcher);
    println!("translated {} lights into accessories", accessories.len());

    let mut host = PollingHost {
        poll_interval: Duration::from_secs(cli.poll_interval),
        ..PollingHost::default()
    };
    host.register(
        ControllerInfo {
            name: "huelink".to_string(),
            pin: cli.pin,
        },
        accessories,
    );

    host.serve().await?;

    Ok(())
}
