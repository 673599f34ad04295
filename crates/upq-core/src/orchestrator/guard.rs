//! RAII guard that clears the single-flight flag when dropped.

use crate::context::UploadContext;

/// Held for the duration of a run. Dropping it (normal return, early
/// return or unwind) clears the flag so the next run can start.
pub(super) struct RunGuard<'a> {
    ctx: &'a UploadContext,
}

impl<'a> RunGuard<'a> {
    /// Take the flag, or None if another run holds it.
    pub(super) fn acquire(ctx: &'a UploadContext) -> Option<Self> {
        ctx.try_begin_run().then(|| Self { ctx })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.ctx.end_run();
    }
}
