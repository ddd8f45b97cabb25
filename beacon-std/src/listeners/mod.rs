//! Standard listener implementations.

pub mod filter;
pub mod logging;

pub use filter::{FilterListener, name_prefix};
pub use logging::LoggingListener;
