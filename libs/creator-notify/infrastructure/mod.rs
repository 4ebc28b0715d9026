//! Infrastructure Layer
//!
//! Process-level services shared by binaries: logging setup and graceful
//! shutdown.

pub mod logging;
pub mod shutdown;

pub use logging::init_tracing;
pub use shutdown::ShutdownManager;
