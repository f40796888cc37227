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

//! portsync application wiring.
//!
//! Layout: `cli.rs` (flags), `bootstrap.rs` (adapter wiring and run loop),
//! `error.rs` (exit-code aware errors), `signals.rs` (shutdown on Ctrl-C / SIGTERM).

pub mod bootstrap;
pub mod cli;
pub mod error;
mod signals;

pub use bootstrap::{BootstrapDependencies, run_app, run_with};
pub use cli::Cli;
pub use error::{AppError, AppResult};
