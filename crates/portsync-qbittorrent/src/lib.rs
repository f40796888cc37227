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

//! qBittorrent Web API adapter implementing [`portsync_core::TorrentClient`].
//!
//! Only the three endpoints needed to keep the listening port aligned are
//! wrapped: `auth/login`, `app/preferences` and `app/setPreferences`.

pub mod client;
pub mod error;
mod session;

pub use client::{Credentials, QbittorrentClient};
pub use error::QbittorrentError;
