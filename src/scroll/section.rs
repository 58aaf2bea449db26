use crate::{
    config::ScrollConfig,
    foundation::error::{StageError, StageResult},
};

/// Which way a threshold was crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

/// One of the four per-section transition callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionEvent {
    EnterForward(usize),
    LeaveForward(usize),
    EnterBackward(usize),
    LeaveBackward(usize),
}

impl SectionEvent {
    pub fn section(self) -> usize {
        match self {
            Self::EnterForward(i)
            | Self::LeaveForward(i)
            | Self::EnterBackward(i)
            | Self::LeaveBackward(i) => i,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Self::EnterForward(_) | Self::LeaveForward(_) => Direction::Forward,
            Self::EnterBackward(_) | Self::LeaveBackward(_) => Direction::Backward,
        }
    }

    pub fn is_enter(self) -> bool {
        matches!(self, Self::EnterForward(_) | Self::EnterBackward(_))
    }
}

/// Scroll thresholds between consecutive sections.
///
/// Boundary `k` sits between section `k` and `k + 1`. It is crossed forward at
/// `(2k + 1)·D − vh/2`, where `D` is one section distance, and crossed backward a hysteresis
/// band earlier so that hovering on a boundary cannot flicker.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionMap {
    forward: Vec<f64>,
    backward: Vec<f64>,
}

impl SectionMap {
    pub fn new(section_count: usize, viewport_height: f64, cfg: &ScrollConfig) -> StageResult<Self> {
        if section_count == 0 {
            return Err(StageError::validation("section map needs at least one section"));
        }
        if !viewport_height.is_finite() || viewport_height <= 0.0 {
            return Err(StageError::validation(format!(
                "viewport height must be > 0, got {viewport_height}"
            )));
        }
        let d = cfg.section_distance_vh * viewport_height;
        let band = cfg.hysteresis_vh * viewport_height;
        let forward: Vec<f64> = (0..section_count - 1)
            .map(|k| (2 * k + 1) as f64 * d - viewport_height / 2.0)
            .collect();
        let backward = forward.iter().map(|t| t - band).collect();
        Ok(Self { forward, backward })
    }

    pub fn section_count(&self) -> usize {
        self.forward.len() + 1
    }

    pub fn forward_thresholds(&self) -> &[f64] {
        &self.forward
    }

    pub fn backward_thresholds(&self) -> &[f64] {
        &self.backward
    }

    /// Section shown at `offset` when arriving from above: a pure step function.
    pub fn section_at(&self, offset: f64) -> usize {
        self.forward.partition_point(|&t| t <= offset)
    }
}

/// Tracks the active section and reports crossings in the order they happen.
#[derive(Clone, Debug)]
pub struct SectionTracker {
    map: SectionMap,
    current: usize,
}

impl SectionTracker {
    pub fn new(map: SectionMap, offset: f64) -> Self {
        let current = map.section_at(offset);
        Self { map, current }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn map(&self) -> &SectionMap {
        &self.map
    }

    /// Swap thresholds (after a resize) without changing the active section.
    pub fn set_map(&mut self, map: SectionMap) {
        self.current = self.current.min(map.section_count() - 1);
        self.map = map;
    }

    /// Move to `offset`, returning every crossing passed on the way.
    ///
    /// Each crossing yields a leave for the old section followed by an enter for the new one.
    /// A jump across several boundaries reports each of them.
    pub fn advance(&mut self, offset: f64) -> Vec<SectionEvent> {
        let mut events = Vec::new();
        while self.current + 1 < self.map.section_count()
            && offset >= self.map.forward[self.current]
        {
            events.push(SectionEvent::LeaveForward(self.current));
            self.current += 1;
            events.push(SectionEvent::EnterForward(self.current));
        }
        while self.current > 0 && offset < self.map.backward[self.current - 1] {
            events.push(SectionEvent::LeaveBackward(self.current));
            self.current -= 1;
            events.push(SectionEvent::EnterBackward(self.current));
        }
        events
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/section.rs"]
mod tests;
