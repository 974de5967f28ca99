//! Node middleware for the stock desk graph.
//!
//! Re-exports [`LoggingMiddleware`] and [`WithNodeLogging`].

mod logging;
mod with_node_logging;

pub use logging::LoggingMiddleware;
pub use with_node_logging::WithNodeLogging;
