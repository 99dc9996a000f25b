//! Progress sinks for long renders.

/// Receives the number of pixels still to be rendered.
///
/// Calls are serialized by the scheduler and the reported counts only ever
/// go down.
pub trait Progress: Send + Sync {
    fn report(&self, remaining: usize);
}

/// Writes progress to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn report(&self, remaining: usize) {
        if remaining == 0 {
            log::info!("Done.");
        } else {
            log::info!("Pixels remaining: {}", remaining);
        }
    }
}

/// Discards progress updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&self, _remaining: usize) {}
}
