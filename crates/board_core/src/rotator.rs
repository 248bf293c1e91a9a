//! Fixed-interval paging over the weekly grid.

use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidePage<T> {
    pub index: usize,
    pub rows: Vec<T>,
}

/// Splits `rows` into contiguous pages of `rows_per_page`; the last page may be short.
pub fn paginate<T>(rows: Vec<T>, rows_per_page: usize) -> Vec<SlidePage<T>> {
    let rows_per_page = rows_per_page.max(1);
    let mut pages = Vec::with_capacity(page_count(rows.len(), rows_per_page));
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        let chunk: Vec<T> = rows.by_ref().take(rows_per_page).collect();
        pages.push(SlidePage {
            index: pages.len(),
            rows: chunk,
        });
    }
    pages
}

pub fn page_count(total_rows: usize, rows_per_page: usize) -> usize {
    total_rows.div_ceil(rows_per_page.max(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideRotator {
    page_count: usize,
    current_index: usize,
}

impl SlideRotator {
    /// Starts on page 0.
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            current_index: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_visible(&self, index: usize) -> bool {
        index == self.current_index
    }

    /// Only rotations with more than one page need a timer.
    pub fn needs_timer(&self) -> bool {
        self.page_count > 1
    }

    pub fn tick(&mut self) -> usize {
        if self.page_count > 0 {
            self.current_index = (self.current_index + 1) % self.page_count;
        }
        self.current_index
    }
}

/// A running rotation timer. Stopping or dropping the handle cancels it.
#[derive(Debug)]
pub struct RotationHandle {
    task: JoinHandle<()>,
}

impl RotationHandle {
    /// Installs the recurring timer on the current tokio runtime.
    ///
    /// `on_advance` receives the newly visible page index once per `period`.
    /// Returns `None` when there is nothing to rotate.
    pub fn spawn<F>(mut rotator: SlideRotator, period: Duration, mut on_advance: F) -> Option<Self>
    where
        F: FnMut(usize) + Send + 'static,
    {
        if !rotator.needs_timer() || period.is_zero() {
            return None;
        }

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let index = rotator.tick();
                tracing::debug!(page = index, pages = rotator.page_count(), "slide advanced");
                on_advance(index);
            }
        });

        Some(Self { task })
    }

    pub fn stop(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for RotationHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "tests/rotator_tests.rs"]
mod tests;
