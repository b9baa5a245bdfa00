use std::sync::atomic::{AtomicU8, Ordering};

use super::filter_kind::FilterKind;

/// Holds the currently selected filter and cycles it on request.
///
/// The selection lives in a single atomic cell so the preview thread, the
/// capture thread and the gesture handler can share one selector through an
/// `Arc` without a lock. Every read returns a value that some completed
/// mutation stored.
#[derive(Debug)]
pub struct FilterSelector {
    current: AtomicU8,
}

impl FilterSelector {
    pub fn new() -> Self {
        Self::starting_at(FilterKind::None)
    }

    pub fn starting_at(kind: FilterKind) -> Self {
        Self {
            current: AtomicU8::new(kind.index() as u8),
        }
    }

    pub fn current(&self) -> FilterKind {
        decode(self.current.load(Ordering::Acquire))
    }

    /// Moves to the next filter, wrapping from the last back to the first.
    pub fn advance(&self) -> FilterKind {
        self.update(FilterKind::next)
    }

    /// Moves to the previous filter, wrapping from the first to the last.
    pub fn retreat(&self) -> FilterKind {
        self.update(FilterKind::previous)
    }

    pub fn select(&self, kind: FilterKind) {
        self.current.store(kind.index() as u8, Ordering::Release);
    }

    fn update(&self, step: fn(FilterKind) -> FilterKind) -> FilterKind {
        let previous = self
            .current
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                Some(step(decode(raw)).index() as u8)
            })
            .unwrap_or_else(|raw| raw);
        let updated = step(decode(previous));
        log::debug!("Filter changed: {} -> {}", decode(previous), updated);
        updated
    }
}

impl Default for FilterSelector {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(raw: u8) -> FilterKind {
    // Only `FilterKind::index` values are ever stored.
    FilterKind::from_index(raw as usize).unwrap_or_default()
}
