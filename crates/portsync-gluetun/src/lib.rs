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

//! Gluetun control server adapter implementing [`portsync_core::PortSource`].

pub mod client;
pub mod error;

pub use client::GluetunPortSource;
pub use error::GluetunError;
