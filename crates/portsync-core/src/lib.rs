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
#![allow(clippy::module_name_repetitions)]

//! Port reconciliation between a VPN gateway and a qBittorrent instance.
//!
//! Layout: `model.rs` (ports, sessions, outcomes), `service.rs` (adapter traits),
//! `source.rs` (file-backed port source), `reconcile.rs` (single cycle),
//! `scheduler.rs` (once/continuous driver with shutdown).

pub mod error;
pub mod model;
pub mod reconcile;
pub mod scheduler;
pub mod service;
pub mod source;

pub use error::{SyncError, SyncResult};
pub use model::{CycleOutcome, Port, Session};
pub use reconcile::Reconciler;
pub use scheduler::{RunMode, RunReport, Scheduler, shutdown_channel};
pub use service::{PortSource, TorrentClient};
pub use source::{FilePortError, FilePortSource};
