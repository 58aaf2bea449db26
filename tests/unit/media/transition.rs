use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{
    foundation::{
        core::shared,
        error::{StageError, StageResult},
    },
    media::pool::{MediaElement, MediaFactory, PlaybackError},
    render::uniforms::TextureId,
};

#[derive(Default)]
struct Log {
    plays: Vec<usize>,
    pauses: Vec<usize>,
}

struct Fake {
    slot: usize,
    playing: bool,
    reject_play: bool,
    frame: Option<image::RgbaImage>,
    log: Rc<RefCell<Log>>,
}

impl MediaElement for Fake {
    fn play_from_start(&mut self) -> Result<(), PlaybackError> {
        if self.reject_play {
            return Err(PlaybackError::new("autoplay blocked"));
        }
        self.playing = true;
        self.log.borrow_mut().plays.push(self.slot);
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
        self.log.borrow_mut().pauses.push(self.slot);
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn native_size(&self) -> Option<(u32, u32)> {
        self.frame.as_ref().map(|f| f.dimensions())
    }

    fn current_frame(&self) -> Option<&image::RgbaImage> {
        self.frame.as_ref()
    }
}

struct Factory {
    log: Rc<RefCell<Log>>,
    reject_play: bool,
    undecoded: bool,
}

impl MediaFactory for Factory {
    fn create(&mut self, slot: usize, source: &str) -> StageResult<Box<dyn MediaElement>> {
        if source == "broken" {
            return Err(StageError::media("cannot open"));
        }
        let shade = (slot as u8) * 40;
        Ok(Box::new(Fake {
            slot,
            playing: false,
            reject_play: self.reject_play,
            frame: (!self.undecoded)
                .then(|| image::RgbaImage::from_pixel(32, 18, image::Rgba([shade, 0, 0, 255]))),
            log: self.log.clone(),
        }))
    }
}

struct Rig {
    ctl: VideoTransitionController,
    pool: Shared<ResourcePool>,
    material: Shared<PlateMaterial>,
    log: Rc<RefCell<Log>>,
}

impl Rig {
    fn is_playing(&self, slot: usize) -> bool {
        self.pool
            .borrow()
            .media(slot)
            .is_some_and(|m| m.is_playing())
    }
}

fn rig_with(reject_play: bool, undecoded: bool) -> Rig {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut sources: Vec<Option<String>> = (0..7).map(|i| Some(format!("m{i}.mp4"))).collect();
    sources[6] = Some("broken".to_owned());
    let pool = shared(ResourcePool::new(
        sources,
        Box::new(Factory {
            log: log.clone(),
            reject_play,
            undecoded,
        }),
    ));
    let material = shared(PlateMaterial::default());
    let ctl = VideoTransitionController::new(
        &TransitionConfig::default(),
        7,
        pool.clone(),
        material.clone(),
    );
    Rig {
        ctl,
        pool,
        material,
        log,
    }
}

fn rig() -> Rig {
    rig_with(false, false)
}

#[test]
fn enter_from_idle_crossfades_in_from_black() {
    let mut r = rig();
    r.ctl.enter(2);
    assert_eq!(r.ctl.pending(), Some(2));
    assert_eq!(r.ctl.current(), None);
    assert_eq!(r.ctl.active_tweens(), 1);
    assert!(r.is_playing(2));
    {
        let m = r.material.borrow();
        assert!(m.use_texture);
        assert_eq!(m.progress, 0.0);
        assert_eq!(m.a.texture, None);
        assert_eq!(m.a.color, Rgb::BLACK);
        assert_eq!(m.b.texture, Some(TextureId(2)));
        assert!((m.b.color.r - 80.0 / 255.0).abs() < 0.02);
        // 32x18 media is wider than the plate.
        assert!((m.b.uv.scale.x - 18.0 / 32.0).abs() < 1e-6);
        assert!((0.0..1000.0).contains(&m.time));
    }

    assert_eq!(r.ctl.tick(0.5), None);
    assert!((r.material.borrow().progress - 0.75).abs() < 1e-6);
    assert_eq!(r.ctl.tick(0.6), Some(TransitionEvent::Committed(2)));
    assert_eq!(r.ctl.current(), Some(2));
    assert_eq!(r.ctl.pending(), None);
    assert_eq!(r.ctl.active_tweens(), 0);
    assert_eq!(r.material.borrow().progress, 1.0);
    assert_eq!(r.ctl.tick(0.1), None);
}

#[test]
fn superseded_pending_slot_is_paused_and_never_committed() {
    let mut r = rig();
    r.ctl.enter(2);
    r.ctl.tick(0.3);
    r.ctl.enter(5);

    assert!(!r.is_playing(2));
    assert_eq!(r.log.borrow().pauses, vec![2]);
    assert_eq!(r.ctl.pending(), Some(5));
    assert_eq!(r.ctl.current(), None);
    assert_eq!(r.ctl.active_tweens(), 1);
    assert_eq!(r.material.borrow().progress, 0.0);

    let mut commits = Vec::new();
    for _ in 0..30 {
        if let Some(ev) = r.ctl.tick(0.05) {
            commits.push(ev);
        }
    }
    assert_eq!(commits, vec![TransitionEvent::Committed(5)]);
    assert_eq!(r.ctl.current(), Some(5));
    assert!(r.is_playing(5));
}

#[test]
fn rapid_enters_keep_one_tween_and_commit_the_last() {
    let mut r = rig();
    for slot in [0, 3, 1, 4, 3, 2] {
        r.ctl.enter(slot);
        assert!(r.ctl.active_tweens() <= 1);
        r.ctl.tick(0.1);
        assert!(r.ctl.active_tweens() <= 1);
    }
    while r.ctl.tick(0.1).is_none() {}
    assert_eq!(r.ctl.current(), Some(2));
    for slot in [0, 1, 3, 4] {
        assert!(!r.is_playing(slot), "slot {slot} still playing");
    }
}

#[test]
fn entering_the_pending_slot_again_is_a_noop() {
    let mut r = rig();
    r.ctl.enter(1);
    r.ctl.tick(0.5);
    r.ctl.enter(1);
    assert_eq!(r.log.borrow().plays, vec![1]);
    assert_eq!(r.ctl.tick(0.5), Some(TransitionEvent::Committed(1)));
}

#[test]
fn entering_the_current_slot_is_a_noop() {
    let mut r = rig();
    r.ctl.enter(1);
    r.ctl.tick(1.0);
    r.ctl.enter(1);
    assert_eq!(r.ctl.active_tweens(), 0);
    assert_eq!(r.log.borrow().plays, vec![1]);
}

#[test]
fn crossfade_between_slots_pauses_previous_on_commit() {
    let mut r = rig();
    r.ctl.enter(1);
    r.ctl.tick(1.0);
    r.ctl.enter(3);
    {
        let m = r.material.borrow();
        assert_eq!(m.a.texture, Some(TextureId(1)));
        assert_eq!(m.b.texture, Some(TextureId(3)));
    }
    assert!(r.is_playing(1));
    r.ctl.tick(1.0);
    assert!(!r.is_playing(1));
    assert_eq!(r.ctl.current(), Some(3));
}

#[test]
fn leave_without_media_only_disables_texture() {
    let mut r = rig();
    r.material.borrow_mut().use_texture = true;
    r.ctl.leave();
    assert!(!r.material.borrow().use_texture);
    assert_eq!(r.ctl.active_tweens(), 0);
    assert!(matches!(r.ctl.state(), TransitionState::Idle));
}

#[test]
fn leave_fades_to_black_then_clears() {
    let mut r = rig();
    r.ctl.enter(4);
    r.ctl.tick(1.0);
    r.ctl.leave();
    assert!(matches!(
        r.ctl.state(),
        TransitionState::FadingToBlack { slot: 4, .. }
    ));
    assert_eq!(r.material.borrow().fade_out, 0.0);
    r.ctl.tick(0.5);
    assert!(r.material.borrow().fade_out > 0.5);
    assert!(r.is_playing(4));

    assert_eq!(r.ctl.tick(0.5), Some(TransitionEvent::Cleared));
    assert!(!r.is_playing(4));
    assert_eq!(r.ctl.current(), None);
    let m = *r.material.borrow();
    assert!(!m.use_texture);
    assert_eq!((m.progress, m.fade_out), (0.0, 0.0));
}

#[test]
fn leave_during_crossfade_promotes_pending() {
    let mut r = rig();
    r.ctl.enter(1);
    r.ctl.tick(1.0);
    r.ctl.enter(3);
    r.ctl.tick(0.2);
    r.ctl.leave();
    assert_eq!(r.ctl.current(), Some(3));
    assert!(!r.is_playing(1));
    assert!(matches!(
        r.ctl.state(),
        TransitionState::FadingToBlack { slot: 3, .. }
    ));
    assert_eq!(r.ctl.active_tweens(), 1);
}

#[test]
fn enter_during_fade_stops_the_fading_slot() {
    let mut r = rig();
    r.ctl.enter(1);
    r.ctl.tick(1.0);
    r.ctl.leave();
    r.ctl.tick(0.3);
    r.ctl.enter(2);
    assert!(!r.is_playing(1));
    assert_eq!(r.ctl.current(), None);
    let m = *r.material.borrow();
    assert_eq!(m.fade_out, 0.0);
    assert_eq!(m.a.texture, None);
    assert_eq!(r.ctl.tick(1.0), Some(TransitionEvent::Committed(2)));
}

#[test]
fn reentering_the_fading_slot_restarts_it() {
    let mut r = rig();
    r.ctl.enter(1);
    r.ctl.tick(1.0);
    r.ctl.leave();
    r.ctl.tick(0.3);
    r.ctl.enter(1);
    assert_eq!(r.ctl.pending(), Some(1));
    assert!(r.is_playing(1));
    assert_eq!(r.ctl.tick(1.0), Some(TransitionEvent::Committed(1)));
}

#[test]
fn rejected_play_does_not_block_the_transition() {
    let mut r = rig_with(true, false);
    r.ctl.enter(0);
    assert_eq!(r.ctl.pending(), Some(0));
    assert!(!r.is_playing(0));
    assert_eq!(r.ctl.tick(1.0), Some(TransitionEvent::Committed(0)));
}

#[test]
fn undecoded_media_uses_fallback_color_and_default_aspect() {
    let mut r = rig_with(false, true);
    r.ctl.enter(3);
    let m = *r.material.borrow();
    assert_eq!(m.b.color, Rgb::gray(0.5));
    assert_eq!(m.b.uv, UvFit::for_media(None));
}

#[test]
fn unavailable_slot_leaves_in_flight_transition_alone() {
    let mut r = rig();
    r.ctl.enter(2);
    r.ctl.tick(0.4);
    r.ctl.enter(6);
    r.ctl.enter(42);
    assert_eq!(r.ctl.pending(), Some(2));
    assert!(r.is_playing(2));
    assert!(r.material.borrow().progress > 0.0);
}

#[test]
fn supersede_cancels_and_returns_the_old_state() {
    let mut r = rig();
    r.ctl.enter(2);
    let old = r.ctl.supersede();
    assert!(old.tween().is_some_and(|t| t.is_cancelled()));
    assert!(matches!(old, TransitionState::Entering { next: 2, .. }));
    assert_eq!(r.ctl.active_tweens(), 0);
    assert_eq!(r.ctl.tick(1.0), None);
}

#[test]
fn dispose_releases_everything() {
    let mut r = rig();
    r.ctl.enter(2);
    r.ctl.dispose();
    assert!(r.pool.borrow().is_disposed());
    assert_eq!(r.ctl.current(), None);
    assert!(!r.material.borrow().use_texture);
    r.ctl.enter(2);
    assert_eq!(r.ctl.pending(), None);
}
