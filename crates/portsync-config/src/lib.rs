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

//! Layered configuration for portsync: built-in defaults, then an optional
//! YAML file, then environment variable overrides.
//!
//! Layout: `model.rs` (typed settings), `loader.rs` (file + environment layering),
//! `validate.rs` (field parsing), `defaults.rs` (default endpoints).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_settings, load_settings_with};
pub use model::{ClientEndpoint, GatewayEndpoint, Settings};
