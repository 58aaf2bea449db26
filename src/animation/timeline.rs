use std::collections::BTreeMap;

use crate::{
    animation::ease::Ease,
    foundation::error::{StageError, StageResult},
};

/// Something whose scalar channels a [`Timeline`] can read and write.
pub trait ChannelState<K> {
    fn channel(&self, key: K) -> f32;
    fn set_channel(&mut self, key: K, value: f32);
}

/// Where a newly added tween starts on the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// At the current end of the timeline.
    Append,
    /// At an absolute time in seconds.
    At(f64),
    /// Relative to the start of the previously added tween (`<`, `<+=x`).
    WithPrevious(f64),
}

#[derive(Clone, Debug)]
struct Segment<K> {
    key: K,
    to: f32,
    start: f64,
    duration: f64,
    ease: Ease,
}

/// Time-addressed keyframe sequence over scalar channels.
///
/// Sampling is pure: the same time and base state always yield the same output. For each channel
/// a segment starts from whatever value the previous segment on that channel ended at, or from
/// the base state when it is the first one.
#[derive(Clone, Debug)]
pub struct Timeline<K> {
    segments: Vec<Segment<K>>,
    by_key: BTreeMap<K, Vec<usize>>, // sorted by segment start
    prev_start: f64,
    end: f64,
}

impl<K> Default for Timeline<K>
where
    K: Copy + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Timeline<K>
where
    K: Copy + Ord,
{
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            by_key: BTreeMap::new(),
            prev_start: 0.0,
            end: 0.0,
        }
    }

    /// Total length in seconds.
    pub fn duration(&self) -> f64 {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Tween every `(key, value)` pair over `duration` seconds, starting at `at`.
    pub fn to(
        &mut self,
        values: &[(K, f32)],
        duration: f64,
        ease: Ease,
        at: Position,
    ) -> StageResult<&mut Self> {
        let start = self.resolve(at)?;
        for &(key, to) in values {
            self.push(key, to, start, duration, ease)?;
        }
        self.prev_start = start;
        Ok(self)
    }

    /// Tween groups of values with start times spaced `stagger` seconds apart.
    ///
    /// Each inner slice is one stagger step; the whole call counts as a single tween for `<`.
    pub fn to_staggered(
        &mut self,
        groups: &[Vec<(K, f32)>],
        duration: f64,
        ease: Ease,
        at: Position,
        stagger: f64,
    ) -> StageResult<&mut Self> {
        let start = self.resolve(at)?;
        for (i, group) in groups.iter().enumerate() {
            let s = start + stagger * i as f64;
            for &(key, to) in group {
                self.push(key, to, s, duration, ease)?;
            }
        }
        self.prev_start = start;
        Ok(self)
    }

    /// Write the timeline's values at `time` into `state`.
    pub fn sample<S: ChannelState<K>>(&self, time: f64, state: &mut S) {
        for (&key, idxs) in &self.by_key {
            let mut v = state.channel(key);
            let mut touched = false;
            for &i in idxs {
                let seg = &self.segments[i];
                if time < seg.start {
                    break;
                }
                touched = true;
                let from = v;
                if seg.duration <= 0.0 || time >= seg.start + seg.duration {
                    v = seg.to;
                } else {
                    let t = (time - seg.start) / seg.duration;
                    let te = seg.ease.apply(t) as f32;
                    v = from + (seg.to - from) * te;
                    break;
                }
            }
            if touched {
                state.set_channel(key, v);
            }
        }
    }

    fn resolve(&self, at: Position) -> StageResult<f64> {
        let t = match at {
            Position::Append => self.end,
            Position::At(t) => t,
            Position::WithPrevious(off) => self.prev_start + off,
        };
        if !t.is_finite() || t < 0.0 {
            return Err(StageError::animation(format!(
                "timeline position resolves to invalid time {t}"
            )));
        }
        Ok(t)
    }

    fn push(&mut self, key: K, to: f32, start: f64, duration: f64, ease: Ease) -> StageResult<()> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(StageError::animation(format!(
                "tween duration must be finite and >= 0, got {duration}"
            )));
        }
        if !to.is_finite() {
            return Err(StageError::animation("tween target value must be finite"));
        }
        let idx = self.segments.len();
        self.segments.push(Segment {
            key,
            to,
            start,
            duration,
            ease,
        });
        let list = self.by_key.entry(key).or_default();
        let segments = &self.segments;
        let at = list.partition_point(|&i| segments[i].start <= start);
        list.insert(at, idx);
        self.end = self.end.max(start + duration);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
