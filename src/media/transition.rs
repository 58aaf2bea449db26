use crate::{
    animation::{ease::Ease, tween::Tween},
    config::TransitionConfig,
    foundation::{
        core::{Rgb, Shared},
        math::Rng64,
    },
    media::{color::ColorSampler, pool::ResourcePool},
    render::uniforms::{PlateMaterial, PlateSource, UvFit},
};

/// Where the plate is heading. The variant owns the only tween that may drive the material.
#[derive(Debug, Clone, Default)]
pub enum TransitionState {
    #[default]
    Idle,
    /// Crossfading from `prev` (or black) to `next`.
    Entering {
        prev: Option<usize>,
        next: usize,
        tween: Tween,
    },
    /// Fading the visible slot to black.
    FadingToBlack { slot: usize, tween: Tween },
}

impl TransitionState {
    pub fn tween(&self) -> Option<&Tween> {
        match self {
            Self::Idle => None,
            Self::Entering { tween, .. } | Self::FadingToBlack { tween, .. } => Some(tween),
        }
    }

    fn tween_mut(&mut self) -> Option<&mut Tween> {
        match self {
            Self::Idle => None,
            Self::Entering { tween, .. } | Self::FadingToBlack { tween, .. } => Some(tween),
        }
    }
}

/// What a finished tween committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    /// The slot became current.
    Committed(usize),
    /// The plate went back to idle black.
    Cleared,
}

/// Hover crossfade state machine over the resource pool and the plate material.
///
/// Only this controller changes play/pause state of pooled media.
pub struct VideoTransitionController {
    duration_secs: f64,
    ease: Ease,
    sampler: ColorSampler,
    pool: Shared<ResourcePool>,
    material: Shared<PlateMaterial>,
    state: TransitionState,
    current: Option<usize>,
    rng: Rng64,
}

impl VideoTransitionController {
    pub fn new(
        cfg: &TransitionConfig,
        seed: u64,
        pool: Shared<ResourcePool>,
        material: Shared<PlateMaterial>,
    ) -> Self {
        Self {
            duration_secs: cfg.duration_secs,
            ease: cfg.ease,
            sampler: ColorSampler::from_config(cfg),
            pool,
            material,
            state: TransitionState::Idle,
            current: None,
            rng: Rng64::new(seed),
        }
    }

    /// Committed visible slot.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Slot being crossfaded in but not committed yet.
    pub fn pending(&self) -> Option<usize> {
        match self.state {
            TransitionState::Entering { next, .. } => Some(next),
            _ => None,
        }
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    /// Number of tweens currently driving the material (0 or 1).
    pub fn active_tweens(&self) -> usize {
        usize::from(self.state.tween().is_some_and(Tween::is_running))
    }

    pub fn pool(&self) -> &Shared<ResourcePool> {
        &self.pool
    }

    /// Cancel the in-flight tween and hand back the state it belonged to.
    ///
    /// After this returns nothing can advance the old tween; the caller decides what happens to
    /// the media it referenced.
    pub fn supersede(&mut self) -> TransitionState {
        let mut old = std::mem::take(&mut self.state);
        if let Some(t) = old.tween_mut() {
            t.cancel();
        }
        old
    }

    /// Hover or focus on `slot`.
    #[tracing::instrument(skip(self), fields(current = ?self.current, pending = ?self.pending()))]
    pub fn enter(&mut self, slot: usize) {
        if self.pending() == Some(slot) {
            return;
        }
        if self.current == Some(slot) && matches!(self.state, TransitionState::Idle) {
            return;
        }
        if self.pool.borrow_mut().acquire(slot).is_none() {
            tracing::debug!(slot, "media slot unavailable, enter ignored");
            return;
        }

        match self.supersede() {
            TransitionState::Entering { next, .. } if next != slot => {
                self.pool.borrow_mut().pause(next);
            }
            TransitionState::FadingToBlack { slot: fading, .. } => {
                self.pool.borrow_mut().pause(fading);
                self.current = None;
            }
            _ => {}
        }

        let prev = self.current;
        let (next_side, prev_side) = {
            let mut pool = self.pool.borrow_mut();
            let Some(media) = pool.acquire(slot) else {
                return;
            };
            if let Err(e) = media.play_from_start() {
                tracing::debug!(slot, error = %e, "play rejected; next enter retries");
            }
            let next_side = PlateSource {
                texture: pool.texture(slot),
                color: pool.dominant_color(slot, &self.sampler),
                uv: UvFit::for_media(pool.media(slot).and_then(|m| m.native_size())),
            };
            let prev_side = match prev.filter(|&p| pool.is_materialized(p)) {
                Some(p) => PlateSource {
                    texture: pool.texture(p),
                    color: pool.dominant_color(p, &self.sampler),
                    uv: UvFit::for_media(pool.media(p).and_then(|m| m.native_size())),
                },
                None => PlateSource {
                    texture: None,
                    color: Rgb::BLACK,
                    uv: next_side.uv,
                },
            };
            (next_side, prev_side)
        };

        let time = self.noise_time();
        {
            let mut m = self.material.borrow_mut();
            m.a = prev_side;
            m.b = next_side;
            m.use_texture = true;
            m.progress = 0.0;
            m.fade_out = 0.0;
            m.time = time;
        }
        tracing::debug!(from = ?prev, to = slot, "crossfade started");
        self.state = TransitionState::Entering {
            prev,
            next: slot,
            tween: Tween::new(0.0, 1.0, self.duration_secs, self.ease),
        };
    }

    /// Hover or focus left the slots.
    #[tracing::instrument(skip(self), fields(current = ?self.current, pending = ?self.pending()))]
    pub fn leave(&mut self) {
        if let TransitionState::Entering { prev, next, .. } = self.supersede() {
            // The interrupted target is what is on screen now.
            if let Some(p) = prev.filter(|&p| p != next) {
                self.pool.borrow_mut().pause(p);
            }
            self.current = Some(next);
        }

        let Some(current) = self.current else {
            let mut m = self.material.borrow_mut();
            m.use_texture = false;
            m.fade_out = 0.0;
            return;
        };
        let color = self
            .pool
            .borrow_mut()
            .dominant_color(current, &self.sampler);
        let time = self.noise_time();
        {
            let mut m = self.material.borrow_mut();
            m.b.color = color;
            m.fade_out = 0.0;
            m.time = time;
        }
        tracing::debug!(slot = current, "fade to black started");
        self.state = TransitionState::FadingToBlack {
            slot: current,
            tween: Tween::new(0.0, 1.0, self.duration_secs, self.ease),
        };
    }

    /// Advance the active tween by `dt` seconds and commit when it finishes.
    pub fn tick(&mut self, dt: f64) -> Option<TransitionEvent> {
        let step = self.state.tween_mut()?.advance(dt)?;
        match self.state {
            TransitionState::Idle => None,
            TransitionState::Entering { prev, next, .. } => {
                self.material.borrow_mut().progress = step.value as f32;
                if !step.finished {
                    return None;
                }
                if let Some(p) = prev.filter(|&p| p != next) {
                    self.pool.borrow_mut().pause(p);
                }
                self.current = Some(next);
                self.state = TransitionState::Idle;
                tracing::debug!(slot = next, "crossfade committed");
                Some(TransitionEvent::Committed(next))
            }
            TransitionState::FadingToBlack { slot, .. } => {
                self.material.borrow_mut().fade_out = step.value as f32;
                if !step.finished {
                    return None;
                }
                self.pool.borrow_mut().pause(slot);
                self.current = None;
                self.material.borrow_mut().clear();
                self.state = TransitionState::Idle;
                tracing::debug!(slot, "plate cleared");
                Some(TransitionEvent::Cleared)
            }
        }
    }

    /// Full teardown: stop everything and release the pool.
    pub fn dispose(&mut self) {
        self.supersede();
        self.pool.borrow_mut().dispose_all();
        self.current = None;
        self.material.borrow_mut().clear();
    }

    fn noise_time(&mut self) -> f32 {
        (self.rng.next_f64_01() * 1000.0) as f32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/transition.rs"]
mod tests;
