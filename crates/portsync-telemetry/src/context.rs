//! Process-level span.

use once_cell::sync::OnceCell;
use tracing::{Span, span::Entered};

use crate::init::BUILD_SHA;

static PROCESS_SPAN: OnceCell<Span> = OnceCell::new();

/// Keeps the `portsync` process span entered until dropped.
///
/// The span is created on first use; later guards re-enter the same span, so
/// the first caller's `mode` is the one recorded.
pub struct GlobalContextGuard {
    _guard: Entered<'static>,
}

impl GlobalContextGuard {
    /// Enter the process span, tagged with the run mode and build identifier.
    #[must_use]
    pub fn new(mode: &str) -> Self {
        let span = PROCESS_SPAN
            .get_or_init(|| tracing::info_span!("portsync", mode, build_sha = BUILD_SHA));
        Self {
            _guard: span.enter(),
        }
    }
}
