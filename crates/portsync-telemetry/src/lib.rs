#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Logging primitives shared across the portsync workspace.
//!
//! Layout: `init.rs` (subscriber installation and log format selection),
//! `context.rs` (process-level span), `error.rs` (telemetry errors).

pub mod context;
pub mod error;
pub mod init;

pub use context::GlobalContextGuard;
pub use error::{Result, TelemetryError};
pub use init::{
    BUILD_SHA, DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging, resolve_filter,
};
