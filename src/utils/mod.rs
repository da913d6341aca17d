//! Utilities shared by the demo binary and host-facing surfaces

pub mod logging;

pub use logging::init_logger;
