use super::*;

const VH: f64 = 1000.0;

fn map() -> SectionMap {
    SectionMap::new(4, VH, &ScrollConfig::default()).unwrap()
}

#[test]
fn thresholds_are_monotonic_with_backward_before_forward() {
    let m = map();
    assert_eq!(m.forward_thresholds(), &[1000.0, 4000.0, 7000.0]);
    for (f, b) in m.forward_thresholds().iter().zip(m.backward_thresholds()) {
        assert!(b < f);
    }
    assert!(m.forward_thresholds().windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn section_at_is_a_step_function() {
    let m = map();
    assert_eq!(m.section_at(0.0), 0);
    assert_eq!(m.section_at(999.0), 0);
    assert_eq!(m.section_at(1000.0), 1);
    assert_eq!(m.section_at(1500.0), 1);
    assert_eq!(m.section_at(6999.0), 2);
    assert_eq!(m.section_at(1e9), 3);
}

#[test]
fn invalid_inputs_are_rejected() {
    assert!(SectionMap::new(0, VH, &ScrollConfig::default()).is_err());
    assert!(SectionMap::new(3, 0.0, &ScrollConfig::default()).is_err());
}

#[test]
fn forward_crossing_emits_leave_then_enter_once() {
    let mut t = SectionTracker::new(map(), 0.0);
    assert_eq!(
        t.advance(1500.0),
        vec![SectionEvent::LeaveForward(0), SectionEvent::EnterForward(1)]
    );
    assert!(t.advance(1600.0).is_empty());
    assert_eq!(t.current(), 1);
}

#[test]
fn hysteresis_band_suppresses_flicker() {
    let mut t = SectionTracker::new(map(), 0.0);
    t.advance(1000.0);
    // Inside the band: still section 1.
    assert!(t.advance(990.0).is_empty());
    assert!(t.advance(1000.0).is_empty());
    assert_eq!(
        t.advance(970.0),
        vec![SectionEvent::LeaveBackward(1), SectionEvent::EnterBackward(0)]
    );
}

#[test]
fn jump_reports_every_boundary_in_order() {
    let mut t = SectionTracker::new(map(), 0.0);
    let ev = t.advance(1e9);
    assert_eq!(ev.len(), 6);
    assert_eq!(ev[0], SectionEvent::LeaveForward(0));
    assert_eq!(ev[5], SectionEvent::EnterForward(3));

    let back = t.advance(0.0);
    assert_eq!(back.len(), 6);
    assert_eq!(back[0], SectionEvent::LeaveBackward(3));
    assert_eq!(back[5], SectionEvent::EnterBackward(0));
    assert!(back.iter().all(|e| e.direction() == Direction::Backward));
}

#[test]
fn last_section_never_leaves_forward() {
    let mut t = SectionTracker::new(map(), 1e9);
    assert_eq!(t.current(), 3);
    assert!(t.advance(1e12).is_empty());
}

#[test]
fn tracker_converges_to_step_function_after_oscillation() {
    let m = map();
    let mut t = SectionTracker::new(m.clone(), 0.0);
    for off in [1200.0, 100.0, 5000.0, 900.0, 7200.0, 3000.0, 4100.0] {
        t.advance(off);
        assert_eq!(t.current(), m.section_at(off));
    }
}
