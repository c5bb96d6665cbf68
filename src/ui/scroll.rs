use std::time::{Duration, Instant};

use super::animation::{Easing, ease};
use super::settings::ListSettings;

/// Time-driven scroll offset with elastic overshoot.
///
/// The offset is never stored directly: it is interpolated from `from` to
/// `target` using the wall-clock time elapsed since `start`. A frame that
/// never arrives halts the animation instead of accumulating drift.
#[derive(Debug, Clone)]
pub struct ScrollState {
    from: f32,
    target: f32,
    start: Instant,
    duration: Duration,
    anim_duration: Duration,
    easing: Easing,
    max_scroll: f32,
    elastic: f32,
}

impl ScrollState {
    pub fn new(settings: &ListSettings, now: Instant) -> Self {
        Self {
            from: 0.0,
            target: 0.0,
            start: now,
            duration: Duration::ZERO,
            anim_duration: settings.scroll_duration(),
            easing: settings.scroll_easing,
            max_scroll: 0.0,
            elastic: settings.elastic_allowance.max(0.0),
        }
    }

    /// Current (interpolated) offset.
    pub fn get(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start);
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.target;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.target - self.from) * ease(t, self.easing)
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn max_scroll(&self) -> f32 {
        self.max_scroll
    }

    pub fn elastic_allowance(&self) -> f32 {
        self.elastic
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        !self.duration.is_zero() && now.saturating_duration_since(self.start) < self.duration
    }

    /// Distance the current offset lies outside `[0, max_scroll]`.
    pub fn overscroll(&self, now: Instant) -> f32 {
        let v = self.get(now);
        if v < 0.0 {
            -v
        } else {
            (v - self.max_scroll).max(0.0)
        }
    }

    /// Move toward `value`. Animated targets may overshoot by the elastic
    /// allowance; immediate targets are clamped strictly into bounds.
    pub fn set_target(&mut self, value: f32, animated: bool, now: Instant) {
        if self.max_scroll <= 0.0 {
            self.snap(0.0, now);
            return;
        }
        if !animated || self.anim_duration.is_zero() {
            self.snap(value.clamp(0.0, self.max_scroll), now);
            return;
        }
        // Restart from where the viewport is now, not from the old target.
        self.from = self.clamp_extension(self.get(now));
        self.target = self.clamp_extension(value);
        self.start = now;
        self.duration = self.anim_duration;
    }

    /// Scroll relative to the current target.
    pub fn scroll_by(&mut self, delta: f32, animated: bool, now: Instant) {
        let target = self.target;
        if delta < 0.0 && target > self.max_scroll {
            // Scrolling back while overscrolled restarts from the bound.
            self.set_target(self.max_scroll + delta, animated, now);
        } else if delta > 0.0 && target < 0.0 {
            self.set_target(delta, animated, now);
        } else {
            self.set_target(target + delta, animated, now);
        }
    }

    /// Update the scroll bound. If the bound shrinks below the target the
    /// offset is clamped, immediately unless `animate` is set.
    pub fn set_max_scroll(&mut self, max: f32, animate: bool, now: Instant) {
        let max = max.max(0.0);
        let shrunk = max < self.max_scroll;
        self.max_scroll = max;
        if max <= 0.0 {
            if self.target != 0.0 || self.is_animating(now) {
                log::debug!("scroll bound collapsed to 0, resetting offset");
            }
            self.snap(0.0, now);
            return;
        }
        if !shrunk {
            return;
        }
        if self.target > max {
            if animate {
                self.set_target(max, true, now);
            } else {
                self.snap(max, now);
            }
        } else if self.is_animating(now) {
            // Restart an in-flight animation from inside the new bounds.
            self.from = self.clamp_extension(self.get(now));
            self.start = now;
        }
    }

    /// Advance the engine. Once an animation settles outside the bounds, a
    /// new animation pulls the offset back to the nearest bound.
    pub fn tick(&mut self, now: Instant) {
        if self.is_animating(now) {
            return;
        }
        if self.target < 0.0 || self.target > self.max_scroll {
            let bound = self.target.clamp(0.0, self.max_scroll);
            self.set_target(bound, true, now);
        }
    }

    fn snap(&mut self, value: f32, now: Instant) {
        self.from = value;
        self.target = value;
        self.start = now;
        self.duration = Duration::ZERO;
    }

    fn clamp_extension(&self, value: f32) -> f32 {
        value.clamp(-self.elastic, self.max_scroll + self.elastic)
    }
}

/// Offset that brings the span `[y, y + height)` into a viewport of
/// `viewport` pixels, keeping `margin` pixels of context around it.
/// Returns `scroll` unchanged when the span is already comfortably visible.
pub fn scroll_for(
    y: f32,
    height: f32,
    scroll: f32,
    viewport: f32,
    forced_margin: f32,
    preferred_margin: f32,
) -> f32 {
    let mut margin = (viewport - height) / 2.0;
    if margin < forced_margin {
        margin = forced_margin;
    } else if margin > preferred_margin {
        margin = preferred_margin;
    }
    let rel_y = y - scroll;
    if rel_y < margin {
        return (y - margin).max(0.0);
    }
    if rel_y + height > viewport - margin {
        return (y - margin).min(y - (viewport - height - margin)).max(0.0);
    }
    scroll
}

/// Scrollbar thumb geometry for a track of `viewport` pixels.
/// Returns `(thumb_y, thumb_height)` relative to the track top, or `None`
/// when the content fits.
pub fn thumb_geometry(
    content: f32,
    viewport: f32,
    offset: f32,
    max_scroll: f32,
    min_thumb: f32,
) -> Option<(f32, f32)> {
    if content <= viewport || viewport <= 0.0 || max_scroll <= 0.0 {
        return None;
    }
    let upper = (viewport - 8.0).max(min_thumb.min(viewport));
    let mut height = (viewport * viewport / content).clamp(min_thumb.min(upper), upper);
    let over = if offset < 0.0 {
        -offset
    } else {
        (offset - max_scroll).max(0.0)
    };
    if over > 0.0 {
        height -= over.min(height * 0.95);
        height = height.max(10.0_f32.min(upper));
    }
    let travel = viewport - height;
    let y = (offset.clamp(0.0, max_scroll) / max_scroll * travel).clamp(0.0, travel);
    Some((y, height))
}
