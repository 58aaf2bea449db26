use crate::{
    config::InputConfig,
    foundation::core::Shared,
    input::{
        events::{EventOutcome, KeyInput, TouchInput, WheelInput},
        guard::{ModalInputGuard, Panel},
        scroll_lock::{PageStyle, ScrollLock},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sibling {
    Prev,
    Next,
}

/// Project detail overlay: one visible panel at a time, in content order.
///
/// The scroll lock is keyed to the overlay being open. Switching panels while open never runs
/// lock or unlock again.
pub struct ProjectOverlay {
    panels: Vec<Panel>,
    current: Option<usize>,
    lock: ScrollLock,
    guard: ModalInputGuard,
    page: Shared<dyn PageStyle>,
    lock_transitions: usize,
}

impl ProjectOverlay {
    pub fn new(
        panels: Vec<Panel>,
        lock: ScrollLock,
        input: InputConfig,
        viewport_height: f64,
        page: Shared<dyn PageStyle>,
    ) -> Self {
        Self {
            panels,
            current: None,
            lock,
            guard: ModalInputGuard::new(input, viewport_height),
            page,
            lock_transitions: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn lock(&self) -> &ScrollLock {
        &self.lock
    }

    pub fn guard(&self) -> &ModalInputGuard {
        &self.guard
    }

    /// Lock plus unlock calls that actually changed state.
    pub fn lock_transitions(&self) -> usize {
        self.lock_transitions
    }

    pub fn current_slug(&self) -> Option<&str> {
        self.current_panel().map(|p| p.slug.as_str())
    }

    pub fn current_panel(&self) -> Option<&Panel> {
        self.panels.get(self.current?)
    }

    pub fn panel(&self, slug: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.slug == slug)
    }

    pub fn panel_mut(&mut self, slug: &str) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|p| p.slug == slug)
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> + '_ {
        self.panels.iter().map(|p| p.slug.as_str())
    }

    pub fn set_viewport_height(&mut self, h: f64) {
        self.guard.set_viewport_height(h);
    }

    /// Show the panel for `slug`. Returns `false` (and changes nothing) for unknown slugs.
    #[tracing::instrument(skip(self))]
    pub fn open(&mut self, slug: &str) -> bool {
        let Some(idx) = self.panels.iter().position(|p| p.slug == slug) else {
            tracing::warn!(slug, "no panel for slug");
            return false;
        };
        if !self.is_open() {
            if self.lock.lock(&mut *self.page.borrow_mut()) {
                self.lock_transitions += 1;
            }
            self.guard.attach();
        }

        let last = self.panels.len() - 1;
        for (i, p) in self.panels.iter_mut().enumerate() {
            let shown = i == idx;
            p.visible = shown;
            p.focused = shown;
            if shown {
                p.set_scroll_top(0.0);
                p.nav = (i > 0, i < last);
            }
        }
        self.current = Some(idx);
        true
    }

    #[tracing::instrument(skip(self))]
    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        for p in &mut self.panels {
            p.visible = false;
            p.focused = false;
        }
        self.current = None;
        self.guard.detach();
        if self.lock.unlock(&mut *self.page.borrow_mut()) {
            self.lock_transitions += 1;
        }
    }

    /// Move to the neighbouring panel. `false` at either end or while closed.
    pub fn open_sibling(&mut self, dir: Sibling) -> bool {
        let Some(idx) = self.current else {
            return false;
        };
        let target = match dir {
            Sibling::Prev => idx.checked_sub(1),
            Sibling::Next => Some(idx + 1).filter(|&i| i < self.panels.len()),
        };
        let Some(slug) = target.and_then(|i| self.panels.get(i)).map(|p| p.slug.clone()) else {
            return false;
        };
        self.open(&slug)
    }

    pub fn on_wheel(&mut self, ev: &WheelInput) -> EventOutcome {
        let panel = self.current.and_then(|i| self.panels.get_mut(i));
        self.guard.handle_wheel(ev, panel)
    }

    pub fn on_keydown(&mut self, ev: &KeyInput) -> EventOutcome {
        let panel = self.current.and_then(|i| self.panels.get_mut(i));
        let out = self.guard.handle_keydown(ev, panel);
        if out.close {
            self.close();
        }
        out.event
    }

    pub fn on_touchmove(&self, ev: &TouchInput) -> EventOutcome {
        self.guard.handle_touchmove(ev, self.current_panel())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/overlay.rs"]
mod tests;
