use crate::{
    config::InputConfig,
    input::events::{DeltaMode, EventOutcome, Key, KeyInput, TouchInput, WheelInput},
};

/// A scrollable content panel inside the overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    pub slug: String,
    scroll_top: f64,
    /// Visible height.
    pub client_height: f64,
    /// Full content height.
    pub scroll_height: f64,
    pub visible: bool,
    pub focused: bool,
    /// Whether the "previous" and "next" links are enabled.
    pub nav: (bool, bool),
}

impl Panel {
    pub fn new(slug: impl Into<String>, client_height: f64, scroll_height: f64) -> Self {
        Self {
            slug: slug.into(),
            scroll_top: 0.0,
            client_height,
            scroll_height,
            visible: false,
            focused: false,
            nav: (false, false),
        }
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Clamped like a browser scroll container.
    pub fn set_scroll_top(&mut self, v: f64) {
        self.scroll_top = v.clamp(0.0, self.max_scroll());
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.set_scroll_top(self.scroll_top + delta);
    }
}

/// Result of a keydown the guard handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyOutcome {
    pub event: EventOutcome,
    /// Escape was pressed; the owner should close the overlay.
    pub close: bool,
}

/// Capturing wheel / keydown / touchmove handlers active while an overlay is open.
///
/// Events aimed at the open panel move only that panel's scroll offset; everything else is
/// suppressed so the frozen page never moves.
#[derive(Clone, Debug)]
pub struct ModalInputGuard {
    cfg: InputConfig,
    viewport_height: f64,
    attached: bool,
}

impl ModalInputGuard {
    pub fn new(cfg: InputConfig, viewport_height: f64) -> Self {
        Self {
            cfg,
            viewport_height,
            attached: false,
        }
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn set_viewport_height(&mut self, h: f64) {
        self.viewport_height = h;
    }

    /// Wheel delta in pixels.
    pub fn normalize_wheel(&self, delta_y: f64, mode: DeltaMode) -> f64 {
        match mode {
            DeltaMode::Pixel => delta_y,
            DeltaMode::Line => delta_y * self.cfg.wheel_line_px,
            DeltaMode::Page => delta_y * self.viewport_height,
        }
    }

    /// Large step for PageUp/PageDown/Space.
    pub fn page_step(&self, client_height: f64) -> f64 {
        (client_height * self.cfg.page_fraction)
            .floor()
            .max(self.cfg.page_floor_px)
    }

    pub fn handle_wheel(&self, ev: &WheelInput, panel: Option<&mut Panel>) -> EventOutcome {
        if !self.attached {
            return EventOutcome::PASS;
        }
        match panel {
            Some(p) if ev.target.is_inside_panel(&p.slug) => {
                p.scroll_by(self.normalize_wheel(ev.delta_y, ev.mode));
                EventOutcome::PREVENT
            }
            _ => EventOutcome::BLOCK,
        }
    }

    pub fn handle_keydown(&self, ev: &KeyInput, panel: Option<&mut Panel>) -> KeyOutcome {
        let pass = KeyOutcome {
            event: EventOutcome::PASS,
            close: false,
        };
        if !self.attached || ev.target.editable {
            return pass;
        }
        let Some(p) = panel else {
            return pass;
        };
        let page = self.page_step(p.client_height);
        let line = self.cfg.arrow_step_px;
        match ev.key {
            Key::Escape => {
                return KeyOutcome {
                    event: EventOutcome::PREVENT,
                    close: true,
                };
            }
            Key::ArrowDown => p.scroll_by(line),
            Key::ArrowUp => p.scroll_by(-line),
            Key::PageDown => p.scroll_by(page),
            Key::PageUp => p.scroll_by(-page),
            Key::Space if ev.shift => p.scroll_by(-page),
            Key::Space => p.scroll_by(page),
            Key::Home => p.set_scroll_top(0.0),
            Key::End => p.set_scroll_top(p.scroll_height),
            Key::Other(_) => return pass,
        }
        KeyOutcome {
            event: EventOutcome::PREVENT,
            close: false,
        }
    }

    /// Touches inside the panel pass untouched so native inertial scrolling keeps working.
    pub fn handle_touchmove(&self, ev: &TouchInput, panel: Option<&Panel>) -> EventOutcome {
        if !self.attached {
            return EventOutcome::PASS;
        }
        match panel {
            Some(p) if ev.target.is_inside_panel(&p.slug) => EventOutcome::PASS,
            _ => EventOutcome::BLOCK,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/guard.rs"]
mod tests;
