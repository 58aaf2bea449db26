use crate::{foundation::core::Shared, scroll::surface::ScrollSurface};

/// Inline style values of `<body>` that the lock overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BodyStyle {
    pub overflow: String,
    pub position: String,
    pub top: String,
    pub left: String,
    pub right: String,
    pub width: String,
}

/// Style access to the page's root and body elements.
pub trait PageStyle {
    fn root_overflow(&self) -> String;

    fn set_root_overflow(&mut self, value: &str);

    fn body_style(&self) -> BodyStyle;

    fn set_body_style(&mut self, style: &BodyStyle);
}

/// In-memory page styles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryPage {
    pub root_overflow: String,
    pub body: BodyStyle,
}

impl PageStyle for MemoryPage {
    fn root_overflow(&self) -> String {
        self.root_overflow.clone()
    }

    fn set_root_overflow(&mut self, value: &str) {
        value.clone_into(&mut self.root_overflow);
    }

    fn body_style(&self) -> BodyStyle {
        self.body.clone()
    }

    fn set_body_style(&mut self, style: &BodyStyle) {
        self.body = style.clone();
    }
}

/// State captured by [`ScrollLock::lock`] and consumed by [`ScrollLock::unlock`].
#[derive(Clone, Debug, PartialEq)]
pub struct LockSnapshot {
    pub scroll_y: f64,
    pub root_overflow: String,
    pub body: BodyStyle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Platform {
    /// iPhone, iPad, iPod, and iPadOS reporting as a desktop Mac.
    Ios,
    #[default]
    Other,
}

impl Platform {
    pub fn from_user_agent(user_agent: &str, platform: &str, max_touch_points: u32) -> Self {
        let apple_mobile = ["iPad", "iPhone", "iPod"]
            .iter()
            .any(|m| user_agent.contains(m));
        let ipad_os = platform == "MacIntel" && max_touch_points > 1;
        if apple_mobile || ipad_os {
            Self::Ios
        } else {
            Self::Other
        }
    }
}

/// Freezes the page at its current offset with layout-level containment.
///
/// Locking is idempotent and unlocking without a lock does nothing; exactly one snapshot exists
/// while locked.
pub struct ScrollLock {
    surface: Shared<dyn ScrollSurface>,
    platform: Platform,
    snapshot: Option<LockSnapshot>,
}

impl ScrollLock {
    pub fn new(surface: Shared<dyn ScrollSurface>, platform: Platform) -> Self {
        Self {
            surface,
            platform,
            snapshot: None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<&LockSnapshot> {
        self.snapshot.as_ref()
    }

    /// Smooth backends are paused too, except on iOS where only native suppression is used.
    pub fn pauses_smooth_scroll(&self) -> bool {
        self.platform != Platform::Ios && self.surface.borrow().is_smooth()
    }

    /// Returns `false` when already locked.
    pub fn lock(&mut self, page: &mut dyn PageStyle) -> bool {
        if self.is_locked() {
            return false;
        }
        if self.pauses_smooth_scroll() {
            self.surface.borrow_mut().stop();
        }
        let scroll_y = self.surface.borrow().offset();
        let snapshot = LockSnapshot {
            scroll_y,
            root_overflow: page.root_overflow(),
            body: page.body_style(),
        };

        page.set_root_overflow("hidden");
        page.set_body_style(&BodyStyle {
            overflow: "hidden".to_owned(),
            position: "fixed".to_owned(),
            top: format!("-{scroll_y}px"),
            left: "0".to_owned(),
            right: "0".to_owned(),
            width: "100%".to_owned(),
        });
        tracing::debug!(scroll_y, "page scroll locked");
        self.snapshot = Some(snapshot);
        true
    }

    /// Returns `false` when nothing was locked.
    pub fn unlock(&mut self, page: &mut dyn PageStyle) -> bool {
        let Some(snapshot) = self.snapshot.take() else {
            return false;
        };
        page.set_root_overflow(&snapshot.root_overflow);
        page.set_body_style(&snapshot.body);
        self.surface.borrow_mut().set_offset(snapshot.scroll_y);
        if self.pauses_smooth_scroll() {
            self.surface.borrow_mut().start();
        }
        tracing::debug!(scroll_y = snapshot.scroll_y, "page scroll restored");
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/scroll_lock.rs"]
mod tests;
