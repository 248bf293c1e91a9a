//! Decides, from post-layout geometry, whether a region scrolls and how.
//!
//! Two policies exist side by side. Marquee rows loop forever by duplicating
//! their items once and translating by the original extent; grid cells
//! scroll once to their end and hold.

use std::time::Duration;

pub const DEFAULT_SCROLL_RATE: f32 = 50.0;
pub const DEFAULT_MIN_HOLD_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Duplicate content once and loop by the original extent, forever.
    SeamlessLoop,
    /// Scroll the overflow once and stop at the end.
    ScrollAndHold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTuning {
    /// Pixels per second.
    pub scroll_rate: f32,
    /// Floor applied to scroll-and-hold durations.
    pub min_hold_duration: Duration,
}

impl Default for AnimationTuning {
    fn default() -> Self {
        Self {
            scroll_rate: DEFAULT_SCROLL_RATE,
            min_hold_duration: DEFAULT_MIN_HOLD_DURATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Infinite,
    Once,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub policy: OverflowPolicy,
    pub axis: Axis,
    /// Loop: the pre-duplication extent. Hold: `-(content - viewport)`.
    pub scroll_distance: f32,
    pub duration: Duration,
    pub repeat: Repeat,
}

impl Animation {
    /// Translation along `axis` at `elapsed`. Linear, never easing or reversing.
    pub fn offset_at(&self, elapsed: Duration) -> f32 {
        let total = self.duration.as_secs_f32();
        if total <= 0.0 {
            return 0.0;
        }
        let progress = match self.repeat {
            Repeat::Infinite => (elapsed.as_secs_f32() % total) / total,
            Repeat::Once => (elapsed.as_secs_f32() / total).min(1.0),
        };
        match self.policy {
            OverflowPolicy::SeamlessLoop => -self.scroll_distance * progress,
            OverflowPolicy::ScrollAndHold => self.scroll_distance * progress,
        }
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.repeat == Repeat::Once && elapsed >= self.duration
    }
}

fn duration_for(distance: f32, rate: f32) -> Duration {
    if rate <= 0.0 || !rate.is_finite() {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(distance.abs() / rate).unwrap_or(Duration::ZERO)
}

/// A measured region together with the items it renders.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedRegion<T> {
    pub axis: Axis,
    pub content_extent: f32,
    pub viewport_extent: f32,
    pub items: Vec<T>,
    animation: Option<Animation>,
}

impl<T: Clone> AnimatedRegion<T> {
    pub fn new(axis: Axis, content_extent: f32, viewport_extent: f32, items: Vec<T>) -> Self {
        Self {
            axis,
            content_extent,
            viewport_extent,
            items,
            animation: None,
        }
    }

    pub fn overflows(&self) -> bool {
        self.content_extent > self.viewport_extent
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// Applies `policy` once. Later calls return the existing animation
    /// untouched, and a region that fits its viewport is never changed.
    pub fn animate(
        &mut self,
        policy: OverflowPolicy,
        tuning: &AnimationTuning,
    ) -> Option<&Animation> {
        if self.animation.is_some() {
            return self.animation.as_ref();
        }
        if !self.overflows() {
            return None;
        }

        let animation = match policy {
            OverflowPolicy::SeamlessLoop => {
                let original_extent = self.content_extent;
                let clones = self.items.clone();
                self.items.extend(clones);
                self.content_extent = original_extent * 2.0;
                Animation {
                    policy,
                    axis: self.axis,
                    scroll_distance: original_extent,
                    duration: duration_for(original_extent, tuning.scroll_rate),
                    repeat: Repeat::Infinite,
                }
            }
            OverflowPolicy::ScrollAndHold => {
                let distance = -(self.content_extent - self.viewport_extent);
                let duration =
                    duration_for(distance, tuning.scroll_rate).max(tuning.min_hold_duration);
                Animation {
                    policy,
                    axis: self.axis,
                    scroll_distance: distance,
                    duration,
                    repeat: Repeat::Once,
                }
            }
        };

        tracing::trace!(
            ?policy,
            axis = ?self.axis,
            distance = animation.scroll_distance,
            duration_ms = animation.duration.as_millis() as u64,
            "region overflow animated"
        );
        self.animation = Some(animation);
        self.animation.as_ref()
    }
}
