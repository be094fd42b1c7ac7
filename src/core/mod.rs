pub mod cancel;
pub mod config;
pub mod error;
pub mod sniffer;

pub use cancel::CancellationToken;
pub use config::Configuration;
pub use error::SnifferError;
pub use sniffer::Sniffer;
