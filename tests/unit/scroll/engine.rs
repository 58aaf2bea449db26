use super::*;
use crate::{
    foundation::core::shared,
    scroll::{document::MemoryDocument, surface::NativeScroll},
};

const VH: f64 = 800.0;

struct Rig {
    doc: Shared<MemoryDocument>,
    scene: Shared<SceneTransforms>,
    surface: Shared<NativeScroll>,
    engine: ScrollPhaseEngine,
}

fn page() -> MemoryDocument {
    MemoryDocument::new()
        .with_section("works-info", &["Prism", "Lattice"])
        .with_section("about-area", &["Hello", "World", "!"])
        .with_section("photos-area", &["Film"])
        .with_section("playground-area", &["Toys"])
}

fn rig_with(doc: MemoryDocument, width: f64) -> Rig {
    let cfg = StageConfig::portfolio();
    let doc = shared(doc);
    let scene = shared(SceneTransforms::initial(Breakpoint::Wide));
    let surface = shared(NativeScroll::new());
    let engine = ScrollPhaseEngine::new(
        &cfg,
        Viewport::new(width, VH).unwrap(),
        doc.clone(),
        scene.clone(),
        surface.clone(),
    )
    .unwrap();
    Rig {
        doc,
        scene,
        surface,
        engine,
    }
}

fn rig() -> Rig {
    rig_with(page(), 1280.0)
}

#[test]
fn startup_shows_first_section_and_blanks_the_rest() {
    let r = rig();
    let d = r.doc.borrow();
    assert_eq!(d.section_texts("works-info"), vec!["Prism", "Lattice"]);
    assert_eq!(d.section_texts("about-area"), vec!["", "", ""]);
    assert!(!d.is_visible("about-area"));
    assert_eq!(d.label(), "Works");
    assert_eq!(r.engine.active_section(), 0);
    assert_eq!(r.engine.registered_count(), 4);
}

#[test]
fn scrolling_one_and_a_half_viewports_swaps_works_for_about() {
    let mut r = rig();
    let ev = r.engine.on_scroll(1.5 * VH);
    assert_eq!(
        ev,
        vec![SectionEvent::LeaveForward(0), SectionEvent::EnterForward(1)]
    );
    assert!(r.engine.on_scroll(1.5 * VH + 1.0).is_empty());
    r.engine.tick(2.0);
    {
        let d = r.doc.borrow();
        assert_eq!(d.section_texts("works-info"), vec!["", ""]);
        assert_eq!(d.section_texts("about-area"), vec!["Hello", "World", "!"]);
        assert!(!d.is_visible("works-info"));
        assert!(d.is_visible("about-area"));
    }

    let back = r.engine.on_scroll(0.0);
    assert_eq!(
        back,
        vec![SectionEvent::LeaveBackward(1), SectionEvent::EnterBackward(0)]
    );
    r.engine.tick(2.0);
    let d = r.doc.borrow();
    assert_eq!(d.section_texts("works-info"), vec!["Prism", "Lattice"]);
    assert_eq!(d.section_texts("about-area"), vec!["", "", ""]);
}

#[test]
fn rapid_oscillation_converges_to_the_same_terminal_state() {
    let mut r = rig();
    for _ in 0..5 {
        r.engine.on_scroll(1.5 * VH);
        r.engine.tick(0.05);
        r.engine.on_scroll(0.0);
        r.engine.tick(0.03);
    }
    r.engine.on_scroll(1.5 * VH);
    r.engine.tick(3.0);
    let d = r.doc.borrow();
    assert_eq!(d.section_texts("works-info"), vec!["", ""]);
    assert_eq!(d.section_texts("about-area"), vec!["Hello", "World", "!"]);
}

#[test]
fn missing_section_is_skipped_without_failing() {
    let doc = MemoryDocument::new()
        .with_section("works-info", &["Prism"])
        .with_section("photos-area", &["Film"]);
    let mut r = rig_with(doc, 1280.0);
    assert_eq!(r.engine.registered_count(), 2);
    assert_eq!(r.engine.section_count(), 4);
    let ev = r.engine.on_scroll(1e6);
    assert_eq!(ev.len(), 6);
    r.engine.tick(3.0);
    assert_eq!(r.engine.active_section(), 3);
    assert_eq!(r.doc.borrow().section_texts("photos-area"), vec![""]);
}

#[test]
fn compact_viewport_scrambles_the_section_label() {
    let mut r = rig_with(page(), 600.0);
    assert_eq!(r.engine.breakpoint(), Breakpoint::Compact);
    r.engine.on_scroll(1.5 * VH);
    assert!(r.engine.is_label_running());
    r.engine.tick(1.0);
    assert_eq!(r.doc.borrow().label(), "About");
    assert!(!r.engine.is_label_running());
}

#[test]
fn wide_viewport_leaves_the_label_alone() {
    let mut r = rig();
    r.engine.on_scroll(1.5 * VH);
    assert!(!r.engine.is_label_running());
    r.engine.tick(1.0);
    assert_eq!(r.doc.borrow().label(), "Works");
}

#[test]
fn growing_past_the_breakpoint_tears_down_the_label_run() {
    let mut r = rig_with(page(), 600.0);
    r.engine.on_scroll(1.5 * VH);
    r.engine.tick(0.1);
    r.engine
        .on_resize(Viewport::new(1400.0, VH).unwrap())
        .unwrap();
    assert_eq!(r.engine.breakpoint(), Breakpoint::Wide);
    assert!(!r.engine.is_label_running());
    assert_eq!(r.scene.borrow().camera_z, 5.0);
}

#[test]
fn scene_follows_scroll_offset() {
    let mut r = rig();
    assert_eq!(*r.scene.borrow(), SceneTransforms::initial(Breakpoint::Wide));
    r.engine.on_scroll(2.0 * 1.5 * VH);
    let moved = r.scene.borrow().clone();
    assert_ne!(moved, SceneTransforms::initial(Breakpoint::Wide));
    r.engine.on_scroll(0.0);
    assert_eq!(*r.scene.borrow(), SceneTransforms::initial(Breakpoint::Wide));
}

#[test]
fn resize_moves_thresholds_without_restarting_runs() {
    let mut r = rig();
    r.engine.on_scroll(1.5 * VH);
    r.engine.tick(0.1);
    // Taller viewport: 1.5·800 px is now above the first boundary (0.5·vh with vh = 2000).
    let ev = r
        .engine
        .on_resize(Viewport::new(1280.0, 2000.0).unwrap())
        .unwrap();
    assert_eq!(
        ev,
        vec![SectionEvent::LeaveBackward(1), SectionEvent::EnterBackward(0)]
    );
    assert_eq!(r.engine.active_section(), 0);
}

#[test]
fn jump_targets_sit_two_distances_apart() {
    let mut r = rig();
    assert_eq!(r.engine.jump_target(0).unwrap(), 0.0);
    assert_eq!(r.engine.jump_target(2).unwrap(), 4.0 * 1.5 * VH);
    assert!(r.engine.jump_target(4).is_err());
    r.engine.jump_to(1).unwrap();
    assert_eq!(r.surface.borrow().offset(), 2.0 * 1.5 * VH);
}

#[test]
fn header_jumps_measure_whole_viewports() {
    let mut r = rig();
    assert_eq!(
        r.engine.jump_target_from(2, JumpOrigin::Header).unwrap(),
        4.0 * VH
    );
    assert!(r.engine.jump_target_from(4, JumpOrigin::Header).is_err());
    r.engine.jump_from(3, JumpOrigin::Header).unwrap();
    assert_eq!(r.surface.borrow().offset(), 6.0 * VH);
}

#[test]
fn jumps_are_dropped_while_the_surface_is_stopped() {
    let mut r = rig();
    r.surface.borrow_mut().set_offset(300.0);
    r.surface.borrow_mut().stop();
    r.engine.jump_to(2).unwrap();
    r.engine.jump_from(1, JumpOrigin::Header).unwrap();
    assert_eq!(r.surface.borrow().offset(), 300.0);
    assert!(r.engine.jump_to(9).is_err());

    r.surface.borrow_mut().start();
    r.engine.jump_to(1).unwrap();
    assert_eq!(r.surface.borrow().offset(), 2.0 * 1.5 * VH);
}
