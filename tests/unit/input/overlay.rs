use super::*;
use crate::{
    foundation::core::shared,
    input::{
        events::{DeltaMode, EventTarget, Key},
        scroll_lock::{MemoryPage, Platform},
    },
    scroll::surface::{NativeScroll, ScrollSurface},
};

struct Rig {
    overlay: ProjectOverlay,
    page: Shared<MemoryPage>,
    surface: Shared<NativeScroll>,
}

fn rig() -> Rig {
    let page = shared(MemoryPage::default());
    let mut native = NativeScroll::new();
    native.set_offset(900.0);
    let surface = shared(native);
    let panels = ["alpha", "beta", "gamma"]
        .into_iter()
        .map(|s| Panel::new(s, 500.0, 2000.0))
        .collect();
    let overlay = ProjectOverlay::new(
        panels,
        ScrollLock::new(surface.clone(), Platform::Other),
        InputConfig::default(),
        800.0,
        page.clone(),
    );
    Rig {
        overlay,
        page,
        surface,
    }
}

#[test]
fn open_locks_once_and_shows_one_panel() {
    let mut r = rig();
    assert!(r.overlay.open("beta"));
    assert!(r.overlay.is_open());
    assert!(r.overlay.is_locked());
    assert!(r.overlay.guard().is_attached());
    assert_eq!(r.overlay.lock_transitions(), 1);
    assert_eq!(r.page.borrow().body.position, "fixed");

    let beta = r.overlay.panel("beta").unwrap();
    assert!(beta.visible && beta.focused);
    assert_eq!(beta.nav, (true, true));
    assert!(!r.overlay.panel("alpha").unwrap().visible);
}

#[test]
fn unknown_slug_is_ignored() {
    let mut r = rig();
    assert!(!r.overlay.open("missing"));
    assert!(!r.overlay.is_open());
    assert!(!r.overlay.is_locked());
}

#[test]
fn sibling_navigation_keeps_the_lock_and_resets_scroll() {
    let mut r = rig();
    r.overlay.open("alpha");
    r.overlay.panel_mut("beta").unwrap().set_scroll_top(700.0);
    let snapshot = r.overlay.lock().snapshot().cloned();

    assert!(r.overlay.open_sibling(Sibling::Next));
    assert_eq!(r.overlay.current_slug(), Some("beta"));
    assert_eq!(r.overlay.lock_transitions(), 1);
    assert!(r.overlay.is_locked());
    assert_eq!(r.overlay.lock().snapshot().cloned(), snapshot);
    assert_eq!(r.overlay.panel("beta").unwrap().scroll_top(), 0.0);
    assert!(!r.overlay.panel("alpha").unwrap().visible);
}

#[test]
fn siblings_stop_at_the_ends() {
    let mut r = rig();
    assert!(!r.overlay.open_sibling(Sibling::Next));
    r.overlay.open("alpha");
    assert_eq!(r.overlay.current_panel().unwrap().nav, (false, true));
    assert!(!r.overlay.open_sibling(Sibling::Prev));
    r.overlay.open("gamma");
    assert_eq!(r.overlay.current_panel().unwrap().nav, (true, false));
    assert!(!r.overlay.open_sibling(Sibling::Next));
    assert!(r.overlay.open_sibling(Sibling::Prev));
    assert_eq!(r.overlay.current_slug(), Some("beta"));
}

#[test]
fn close_restores_page_and_detaches() {
    let mut r = rig();
    r.overlay.open("alpha");
    r.surface.borrow_mut().set_offset(0.0);
    r.overlay.close();
    assert!(!r.overlay.is_open());
    assert!(!r.overlay.guard().is_attached());
    assert_eq!(*r.page.borrow(), MemoryPage::default());
    assert_eq!(r.surface.borrow().offset(), 900.0);
    assert_eq!(r.overlay.lock_transitions(), 2);

    r.overlay.close();
    assert_eq!(r.overlay.lock_transitions(), 2);
}

#[test]
fn routed_events_touch_only_the_open_panel() {
    let mut r = rig();
    r.overlay.open("alpha");
    let inside = r.overlay.on_wheel(&WheelInput {
        delta_y: 120.0,
        mode: DeltaMode::Pixel,
        target: EventTarget::panel("alpha"),
    });
    assert_eq!(inside, EventOutcome::PREVENT);
    let outside = r.overlay.on_wheel(&WheelInput {
        delta_y: 120.0,
        mode: DeltaMode::Pixel,
        target: EventTarget::page(),
    });
    assert_eq!(outside, EventOutcome::BLOCK);
    assert_eq!(r.overlay.panel("alpha").unwrap().scroll_top(), 120.0);
    assert_eq!(r.surface.borrow().offset(), 900.0);

    let touch = r.overlay.on_touchmove(&TouchInput {
        target: EventTarget::page(),
    });
    assert!(touch.propagation_stopped);
}

#[test]
fn escape_closes_the_overlay() {
    let mut r = rig();
    r.overlay.open("gamma");
    let out = r.overlay.on_keydown(&KeyInput {
        key: Key::Escape,
        shift: false,
        target: EventTarget::panel("gamma"),
    });
    assert!(out.default_prevented);
    assert!(!r.overlay.is_open());
    assert!(!r.overlay.is_locked());
}

#[test]
fn closed_overlay_passes_events() {
    let mut r = rig();
    let out = r.overlay.on_wheel(&WheelInput {
        delta_y: 10.0,
        mode: DeltaMode::Pixel,
        target: EventTarget::page(),
    });
    assert_eq!(out, EventOutcome::PASS);
}
