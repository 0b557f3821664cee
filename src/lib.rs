pub mod capture;
pub mod config;
pub mod db;
pub mod lircd;
pub mod session;
pub mod signal;
mod telemetry;

pub use signal::SignalError;
pub use telemetry::init_tracing;
