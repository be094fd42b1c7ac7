pub mod core;
pub mod network;
pub mod report;
pub mod setup_logger;
