//! MCP9600 thermocouple-to-digital converter driver
//!
//! The driver ([`Mcp9600`]) is synchronous and owns a [`Transport`]: one
//! register pointer write followed by one sized read per operation. The
//! remaining modules wire it into a small polling service that loads
//! `sensors.toml`, configures each device and publishes readings.

// Public modules
pub mod bus;
pub mod config;
pub mod errors;
pub mod messages;
pub mod registers;
pub mod registry;
pub mod scheduler;
pub mod sensors;

// Re-export commonly used types
pub use bus::{I2cTransport, Transport};
pub use config::{load_sensor_config, SensorConfig};
pub use errors::{BusError, SensorError, SensorResult};
pub use registers::{Alert, Register, RegisterGroup};
pub use scheduler::spawn_sensor_tasks;
pub use sensors::{Mcp9600, ThermocoupleFrame};

use tracing_subscriber::EnvFilter;

/// Initialize tracing with default configuration
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Run the monitor with the configuration directory at `config_path`
///
/// Readings are written to stdout as JSON lines until Ctrl-C.
#[cfg(feature = "linux-hal")]
pub async fn run_monitor(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tokio::sync::mpsc;
    use tracing::info;

    info!("[Mcp9600Monitor] starting up...");

    let sensor_config_path = format!("{}/sensors.toml", config_path);
    let sensor_config = load_sensor_config(&sensor_config_path)?;
    info!("[config] loaded {} sensor(s)", sensor_config.sensors.len());

    // Bring-up talks to the bus synchronously.
    let sensors = tokio::task::block_in_place(|| registry::init_all(&sensor_config))?;
    info!("[registry] sensors configured");

    let (tx, mut rx) = mpsc::channel(64);
    let handles = spawn_sensor_tasks(sensors, tx);
    info!("[main] sensor tasks launched");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(msg) => println!("{}", msg.to_json_line()?),
                None => break,
            },
            _ = &mut shutdown => {
                info!("[main] shutting down");
                break;
            }
        }
    }

    for h in handles {
        h.abort();
    }
    Ok(())
}
