pub mod config;
pub mod logger;
pub mod throttle;

pub use config::*;
pub use logger::setup_logging;
pub use throttle::Throttle;
