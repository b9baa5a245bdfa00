use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::filtering::domain::filter_kind::FilterKind;

/// Why a preview frame never reached the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// The filter could not produce an output.
    FilterFailed,
    /// The display side had not consumed earlier frames yet.
    DisplayBusy,
    /// The device reported an error instead of a frame.
    DeviceError,
}

/// Observer for session events (frame timings, drops, captures).
///
/// Keeps the workers free of any particular output mechanism so the CLI,
/// an embedding UI and tests can each watch the session their own way.
pub trait SessionLogger: Send {
    /// A preview frame was filtered in `duration_ms`.
    fn frame_processed(&mut self, filter: FilterKind, duration_ms: f64);

    fn frame_dropped(&mut self, reason: DropReason);

    /// A capture finished, successfully or not.
    fn capture_finished(&mut self, filter: FilterKind, duration_ms: f64, success: bool);

    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Logger shared between the preview and capture threads.
pub type SharedSessionLogger = Arc<Mutex<dyn SessionLogger>>;

/// Silent logger that discards all events.
pub struct NullSessionLogger;

impl NullSessionLogger {
    pub fn shared() -> SharedSessionLogger {
        Arc::new(Mutex::new(NullSessionLogger))
    }
}

impl SessionLogger for NullSessionLogger {
    fn frame_processed(&mut self, _filter: FilterKind, _duration_ms: f64) {}
    fn frame_dropped(&mut self, _reason: DropReason) {}
    fn capture_finished(&mut self, _filter: FilterKind, _duration_ms: f64, _success: bool) {}
    fn info(&mut self, _message: &str) {}
}

/// Aggregates per-filter timings and drop counts, reporting through `log`.
///
/// A progress line is logged every `throttle_frames` preview frames.
pub struct LogSessionLogger {
    throttle_frames: usize,
    timings: HashMap<FilterKind, Vec<f64>>,
    drops: HashMap<DropReason, usize>,
    captures: Vec<(FilterKind, f64, bool)>,
    frames: usize,
    start_time: Instant,
}

impl LogSessionLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            drops: HashMap::new(),
            captures: Vec::new(),
            frames: 0,
            start_time: Instant::now(),
        }
    }

    pub fn shared(throttle_frames: usize) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::new(throttle_frames)))
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn drops(&self, reason: DropReason) -> usize {
        self.drops.get(&reason).copied().unwrap_or(0)
    }

    pub fn timings_for(&self, filter: FilterKind) -> Option<&[f64]> {
        self.timings.get(&filter).map(|v| v.as_slice())
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.drops.is_empty() && self.captures.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Session summary ({} preview frames, {elapsed_s:.1}s):",
            self.frames
        )];

        for kind in FilterKind::ALL {
            if let Some(durations) = self.timings.get(&kind) {
                let total: f64 = durations.iter().sum();
                let avg = total / durations.len() as f64;
                lines.push(format!(
                    "  {:12}: {:5} frames  avg {avg:6.1}ms",
                    kind.name(),
                    durations.len()
                ));
            }
        }

        let mut reasons: Vec<_> = self.drops.iter().collect();
        reasons.sort_by_key(|(reason, _)| format!("{reason:?}"));
        for (reason, count) in reasons {
            lines.push(format!("  dropped ({reason:?}): {count}"));
        }

        for (kind, duration, success) in &self.captures {
            let outcome = if *success { "ok" } else { "failed" };
            lines.push(format!("  capture [{kind}]: {outcome} in {duration:.1}ms"));
        }

        if self.frames > 0 && elapsed_s > 0.0 {
            lines.push(format!(
                "  Preview throughput: {:.1} fps",
                self.frames as f64 / elapsed_s
            ));
        }

        Some(lines.join("\n"))
    }
}

impl Default for LogSessionLogger {
    fn default() -> Self {
        Self::new(30)
    }
}

impl SessionLogger for LogSessionLogger {
    fn frame_processed(&mut self, filter: FilterKind, duration_ms: f64) {
        self.frames += 1;
        self.timings.entry(filter).or_default().push(duration_ms);
        if self.frames % self.throttle_frames == 0 {
            log::info!("Preview: {} frames ({filter}, {duration_ms:.1}ms)", self.frames);
        }
    }

    fn frame_dropped(&mut self, reason: DropReason) {
        *self.drops.entry(reason).or_default() += 1;
    }

    fn capture_finished(&mut self, filter: FilterKind, duration_ms: f64, success: bool) {
        self.captures.push((filter, duration_ms, success));
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
