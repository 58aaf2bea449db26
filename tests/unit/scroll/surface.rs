use super::*;

fn smooth() -> SmoothScroll {
    SmoothScroll::new(&SmoothScrollConfig::default())
}

#[test]
fn native_clamps_to_limit_and_zero() {
    let mut s = NativeScroll::new();
    s.set_limit(Some(500.0));
    s.set_offset(900.0);
    assert_eq!(s.offset(), 500.0);
    s.set_offset(-10.0);
    assert_eq!(s.offset(), 0.0);
}

#[test]
fn native_ignores_user_scroll_while_stopped() {
    let mut s = NativeScroll::new();
    s.user_scroll(100.0);
    assert_eq!(s.offset(), 100.0);
    s.stop();
    s.user_scroll(100.0);
    assert_eq!(s.offset(), 100.0);
    s.set_offset(40.0);
    assert_eq!(s.offset(), 40.0);
}

#[test]
fn smooth_glides_to_target() {
    let mut s = smooth();
    s.user_scroll(300.0);
    assert_eq!(s.offset(), 0.0);
    assert_eq!(s.target(), 300.0);
    s.tick(0.3);
    let mid = s.offset();
    assert!(mid > 0.0 && mid < 300.0);
    s.tick(5.0);
    assert_eq!(s.offset(), 300.0);
    assert!(!s.is_animating());
}

#[test]
fn smooth_wheel_deltas_accumulate_on_target() {
    let mut s = smooth();
    s.user_scroll(100.0);
    s.tick(0.1);
    s.user_scroll(100.0);
    assert_eq!(s.target(), 200.0);
}

#[test]
fn smooth_stop_cancels_animation_and_blocks_input() {
    let mut s = smooth();
    s.scroll_to(1000.0, 3.5);
    s.tick(0.2);
    let at = s.offset();
    s.stop();
    s.tick(1.0);
    assert_eq!(s.offset(), at);
    s.user_scroll(50.0);
    s.scroll_to(10.0, 1.0);
    s.tick(1.0);
    assert_eq!(s.offset(), at);

    s.start();
    s.scroll_to(10.0, 0.0);
    s.tick(0.016);
    assert_eq!(s.offset(), 10.0);
}
