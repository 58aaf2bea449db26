use crate::animation::ease::Ease;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TweenState {
    Running,
    Completed,
    Cancelled,
}

/// One step of a running tween.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenStep {
    /// Eased value after this step.
    pub value: f64,
    /// `true` exactly once: on the step that reaches the end.
    pub finished: bool,
}

/// Scalar tween driven by an external clock.
///
/// There are no stored callbacks: the owner learns about completion from the value returned by
/// [`Tween::advance`], so a cancelled tween can never mutate anything afterwards.
#[derive(Clone, Debug)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: f64,
    ease: Ease,
    elapsed: f64,
    state: TweenState,
}

impl Tween {
    /// Start a tween at `from`. A non-positive duration finishes on the first step.
    pub fn new(from: f64, to: f64, duration_secs: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration_secs.max(0.0),
            ease,
            elapsed: 0.0,
            state: TweenState::Running,
        }
    }

    /// Move time forward by `dt` seconds.
    ///
    /// Returns `None` once the tween is completed or cancelled.
    pub fn advance(&mut self, dt: f64) -> Option<TweenStep> {
        if self.state != TweenState::Running {
            return None;
        }
        self.elapsed += dt.max(0.0);
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        };
        let finished = t >= 1.0;
        if finished {
            self.state = TweenState::Completed;
        }
        Some(TweenStep {
            value: self.value_at(t),
            finished,
        })
    }

    /// Halt synchronously; no further steps are produced.
    pub fn cancel(&mut self) {
        if self.state == TweenState::Running {
            self.state = TweenState::Cancelled;
        }
    }

    /// Rewind to the start and run again, discarding any progress.
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.state = TweenState::Running;
    }

    pub fn is_running(&self) -> bool {
        self.state == TweenState::Running
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == TweenState::Cancelled
    }

    /// Current eased value (the start value before the first step).
    pub fn value(&self) -> f64 {
        let t = if self.duration <= 0.0 {
            if self.elapsed > 0.0 { 1.0 } else { 0.0 }
        } else {
            (self.elapsed / self.duration).min(1.0)
        };
        self.value_at(t)
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    fn value_at(&self, t: f64) -> f64 {
        self.from + (self.to - self.from) * self.ease.apply(t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
