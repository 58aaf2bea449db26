use super::*;
use crate::{
    config::SmoothScrollConfig,
    foundation::core::shared,
    scroll::surface::{NativeScroll, SmoothScroll},
};

fn styled_page() -> MemoryPage {
    MemoryPage {
        root_overflow: "auto".to_owned(),
        body: BodyStyle {
            overflow: "visible".to_owned(),
            position: "relative".to_owned(),
            ..BodyStyle::default()
        },
    }
}

fn native_at(offset: f64) -> Shared<dyn ScrollSurface> {
    let mut s = NativeScroll::new();
    s.set_offset(offset);
    shared(s)
}

#[test]
fn lock_fixes_the_page_at_its_offset() {
    let mut page = styled_page();
    let mut lock = ScrollLock::new(native_at(1234.0), Platform::Other);
    assert!(lock.lock(&mut page));
    assert!(lock.is_locked());
    assert_eq!(page.root_overflow, "hidden");
    assert_eq!(page.body.position, "fixed");
    assert_eq!(page.body.top, "-1234px");
    assert_eq!(page.body.width, "100%");
    assert_eq!(lock.snapshot().unwrap().scroll_y, 1234.0);
}

#[test]
fn repeated_lock_then_one_unlock_round_trips() {
    let before = styled_page();
    let mut page = before.clone();
    let surface = native_at(500.0);
    let mut lock = ScrollLock::new(surface.clone(), Platform::Other);

    assert!(lock.lock(&mut page));
    // A fixed body drops the document scroll position.
    surface.borrow_mut().set_offset(0.0);
    for _ in 0..3 {
        assert!(!lock.lock(&mut page));
    }
    assert_eq!(lock.snapshot().unwrap().scroll_y, 500.0);

    assert!(lock.unlock(&mut page));
    assert_eq!(page, before);
    assert_eq!(surface.borrow().offset(), 500.0);
    assert!(lock.snapshot().is_none());
}

#[test]
fn unlock_without_lock_is_a_noop() {
    let mut page = styled_page();
    let surface = native_at(42.0);
    let mut lock = ScrollLock::new(surface.clone(), Platform::Other);
    assert!(!lock.unlock(&mut page));
    assert_eq!(page, styled_page());
    assert_eq!(surface.borrow().offset(), 42.0);
}

#[test]
fn smooth_backend_is_paused_except_on_ios() {
    let smooth: Shared<dyn ScrollSurface> =
        shared(SmoothScroll::new(&SmoothScrollConfig::default()));
    let mut page = MemoryPage::default();

    let mut lock = ScrollLock::new(smooth.clone(), Platform::Other);
    assert!(lock.pauses_smooth_scroll());
    lock.lock(&mut page);
    assert!(smooth.borrow().is_stopped());
    lock.unlock(&mut page);
    assert!(!smooth.borrow().is_stopped());

    let mut lock = ScrollLock::new(smooth.clone(), Platform::Ios);
    assert!(!lock.pauses_smooth_scroll());
    lock.lock(&mut page);
    assert!(!smooth.borrow().is_stopped());
    lock.unlock(&mut page);
}

#[test]
fn native_surface_is_never_stopped() {
    let surface = native_at(0.0);
    let mut lock = ScrollLock::new(surface.clone(), Platform::Other);
    lock.lock(&mut MemoryPage::default());
    assert!(!surface.borrow().is_stopped());
}

#[test]
fn platform_detection() {
    let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";
    assert_eq!(Platform::from_user_agent(iphone, "iPhone", 5), Platform::Ios);
    let mac = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";
    assert_eq!(Platform::from_user_agent(mac, "MacIntel", 5), Platform::Ios);
    assert_eq!(Platform::from_user_agent(mac, "MacIntel", 0), Platform::Other);
    assert_eq!(
        Platform::from_user_agent("Mozilla/5.0 (X11; Linux x86_64)", "Linux x86_64", 0),
        Platform::Other
    );
}
