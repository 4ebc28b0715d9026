//! CreatorHub Realtime - Main Library
//!
//! This crate ties the realtime notification client together for binaries
//! and embedding applications.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, runners)
//! - **creator-notify**: Notification domain (re-exported from workspace)
//! - **livewire**: Channel session library (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust
//! use creatorhub_realtime::bin_common::{load_config_from_env, ConfigType};
//! use creatorhub_realtime::creator_notify::RealtimeConfig;
//! ```

// Re-export workspace libraries for convenience
pub use creator_notify;
pub use livewire;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables
    //!
    //! Provides shared functionality for the presentation layer (binaries).

    pub mod cli;
    pub mod runner;

    pub use cli::{load_config_from_env, parse_args, ConfigType};
    pub use runner::{BinaryRunner, RunConfig};
}
