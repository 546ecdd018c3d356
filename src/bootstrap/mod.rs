pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{default_config_path, load_config, load_config_or_default, ConfigSource};
pub use self::tracing::init_tracing_subscriber;
pub use wiring::{start_registration_flow, wire_dependencies, DevicePorts, WiredApp, WiringError};
