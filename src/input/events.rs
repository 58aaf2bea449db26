//! Input events as seen by the capturing listeners, and what a handler did with them.

/// Unit of a wheel delta.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Part of the page an event was dispatched to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Region {
    /// Inside the content panel with this slug.
    Panel(String),
    /// Overlay backdrop, close button, navigation links.
    OverlayChrome,
    /// Anything behind the overlay.
    Page,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventTarget {
    pub region: Region,
    /// Text inputs, text areas, selects and contenteditable regions.
    pub editable: bool,
}

impl EventTarget {
    pub fn page() -> Self {
        Self {
            region: Region::Page,
            editable: false,
        }
    }

    pub fn chrome() -> Self {
        Self {
            region: Region::OverlayChrome,
            editable: false,
        }
    }

    pub fn panel(slug: impl Into<String>) -> Self {
        Self {
            region: Region::Panel(slug.into()),
            editable: false,
        }
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn is_inside_panel(&self, slug: &str) -> bool {
        matches!(&self.region, Region::Panel(s) if s == slug)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WheelInput {
    pub delta_y: f64,
    pub mode: DeltaMode,
    pub target: EventTarget,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Home,
    End,
    Space,
    Other(String),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Home" => Self::Home,
            "End" => Self::End,
            " " | "Spacebar" => Self::Space,
            other => Self::Other(other.to_owned()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
    pub target: EventTarget,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TouchInput {
    pub target: EventTarget,
}

/// What a capturing handler did to an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl EventOutcome {
    /// Left alone.
    pub const PASS: Self = Self {
        default_prevented: false,
        propagation_stopped: false,
    };

    /// Default action suppressed; the event still propagates.
    pub const PREVENT: Self = Self {
        default_prevented: true,
        propagation_stopped: false,
    };

    /// Fully swallowed.
    pub const BLOCK: Self = Self {
        default_prevented: true,
        propagation_stopped: true,
    };
}
