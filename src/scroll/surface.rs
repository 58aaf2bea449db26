use crate::{
    animation::{ease::Ease, tween::Tween},
    config::SmoothScrollConfig,
};

/// Narrow capability over the page's scroll container.
///
/// Programmatic `set_offset` always applies immediately. User input (`user_scroll`) and animated
/// `scroll_to` are ignored while the surface is stopped.
pub trait ScrollSurface {
    fn offset(&self) -> f64;

    fn set_offset(&mut self, offset: f64);

    fn stop(&mut self);

    fn start(&mut self);

    fn is_stopped(&self) -> bool;

    /// Whether this surface animates scrolling itself (and therefore must be paused by scroll
    /// locks).
    fn is_smooth(&self) -> bool {
        false
    }

    /// User-driven scroll delta in pixels.
    fn user_scroll(&mut self, delta: f64) {
        if !self.is_stopped() {
            let next = self.offset() + delta;
            self.set_offset(next);
        }
    }

    /// Animated jump. Surfaces without animation jump immediately.
    fn scroll_to(&mut self, target: f64, _duration_secs: f64) {
        if !self.is_stopped() {
            self.set_offset(target);
        }
    }

    /// Advance any running scroll animation.
    fn tick(&mut self, _dt: f64) {}
}

fn clamp_offset(v: f64, limit: Option<f64>) -> f64 {
    let v = v.max(0.0);
    match limit {
        Some(max) => v.min(max.max(0.0)),
        None => v,
    }
}

/// Plain document scrolling.
#[derive(Clone, Debug, Default)]
pub struct NativeScroll {
    offset: f64,
    limit: Option<f64>,
    stopped: bool,
}

impl NativeScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest reachable offset (document height minus viewport height).
    pub fn set_limit(&mut self, limit: Option<f64>) {
        self.limit = limit;
        self.offset = clamp_offset(self.offset, limit);
    }
}

impl ScrollSurface for NativeScroll {
    fn offset(&self) -> f64 {
        self.offset
    }

    fn set_offset(&mut self, offset: f64) {
        self.offset = clamp_offset(offset, self.limit);
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn start(&mut self) {
        self.stopped = false;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }
}

#[derive(Clone, Debug)]
struct ScrollAnim {
    target: f64,
    tween: Tween,
}

/// Eased scrolling: wheel deltas and jumps glide to their target instead of snapping.
#[derive(Clone, Debug)]
pub struct SmoothScroll {
    current: f64,
    limit: Option<f64>,
    stopped: bool,
    duration_secs: f64,
    ease: Ease,
    anim: Option<ScrollAnim>,
}

impl SmoothScroll {
    pub fn new(cfg: &SmoothScrollConfig) -> Self {
        Self {
            current: 0.0,
            limit: None,
            stopped: false,
            duration_secs: cfg.duration_secs,
            ease: cfg.ease,
            anim: None,
        }
    }

    pub fn set_limit(&mut self, limit: Option<f64>) {
        self.limit = limit;
        self.current = clamp_offset(self.current, limit);
    }

    /// Where the running animation is heading, or the current offset.
    pub fn target(&self) -> f64 {
        self.anim.as_ref().map_or(self.current, |a| a.target)
    }

    pub fn is_animating(&self) -> bool {
        self.anim.is_some()
    }

    fn animate_to(&mut self, target: f64, duration_secs: f64) {
        let target = clamp_offset(target, self.limit);
        self.anim = Some(ScrollAnim {
            target,
            tween: Tween::new(self.current, target, duration_secs, self.ease),
        });
    }
}

impl ScrollSurface for SmoothScroll {
    fn offset(&self) -> f64 {
        self.current
    }

    fn set_offset(&mut self, offset: f64) {
        self.anim = None;
        self.current = clamp_offset(offset, self.limit);
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.anim = None;
    }

    fn start(&mut self) {
        self.stopped = false;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn is_smooth(&self) -> bool {
        true
    }

    fn user_scroll(&mut self, delta: f64) {
        if self.stopped {
            return;
        }
        let target = self.target() + delta;
        self.animate_to(target, self.duration_secs);
    }

    fn scroll_to(&mut self, target: f64, duration_secs: f64) {
        if self.stopped {
            return;
        }
        self.animate_to(target, duration_secs);
    }

    fn tick(&mut self, dt: f64) {
        let Some(anim) = self.anim.as_mut() else {
            return;
        };
        if let Some(step) = anim.tween.advance(dt) {
            self.current = step.value;
            if step.finished {
                self.current = anim.target;
                self.anim = None;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/surface.rs"]
mod tests;
