//! Scroll-scrubbed transform phases for the mask array and the plate.
//!
//! Each phase owns a time-based [`Timeline`] and a scroll window. Scroll progress through the
//! window is mapped to timeline time; phases are folded in order starting from the rest layout,
//! so a later phase always starts from where the earlier ones ended.

use std::f32::consts::PI;

use crate::{
    animation::{
        ease::Ease,
        timeline::{Position, Timeline},
    },
    foundation::{
        core::Breakpoint,
        error::{StageError, StageResult},
    },
    render::scene::{Channel, PRISM_COUNT, SceneKey, SceneNode, SceneTransforms},
};

const EASE_OUT: Ease = Ease::OutQuart;
const EASE_IN: Ease = Ease::InQuart;

/// A scroll position expressed relative to the page geometry: `distances` section distances
/// down the page, minus `viewport` viewport heights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollAnchor {
    pub distances: f64,
    pub viewport: f64,
}

impl ScrollAnchor {
    pub const fn new(distances: f64, viewport: f64) -> Self {
        Self {
            distances,
            viewport,
        }
    }

    pub fn resolve(self, distance_px: f64, viewport_px: f64) -> f64 {
        self.distances * distance_px - self.viewport * viewport_px
    }
}

/// Scroll range a phase is scrubbed over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseWindow {
    pub start: ScrollAnchor,
    pub end: ScrollAnchor,
}

impl PhaseWindow {
    pub fn range(&self, distance_px: f64, viewport_px: f64) -> (f64, f64) {
        (
            self.start.resolve(distance_px, viewport_px),
            self.end.resolve(distance_px, viewport_px),
        )
    }

    /// Clamped 0..1 progress of `offset` through the window.
    pub fn progress(&self, offset: f64, distance_px: f64, viewport_px: f64) -> f64 {
        let (s, e) = self.range(distance_px, viewport_px);
        if e <= s {
            return if offset >= e { 1.0 } else { 0.0 };
        }
        ((offset - s) / (e - s)).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseId {
    WorkToAbout,
    AboutToPhotos,
    PhotosToPlayground,
}

impl PhaseId {
    pub const ALL: [Self; 3] = [Self::WorkToAbout, Self::AboutToPhotos, Self::PhotosToPlayground];

    pub fn name(self) -> &'static str {
        match self {
            Self::WorkToAbout => "work->about",
            Self::AboutToPhotos => "about->photos",
            Self::PhotosToPlayground => "photos->playground",
        }
    }

    /// Scroll window shared by both keyframe sets.
    pub fn window(self) -> PhaseWindow {
        let (start, end) = match self {
            Self::WorkToAbout => (ScrollAnchor::new(1.0, 0.9), ScrollAnchor::new(2.0, 0.5)),
            Self::AboutToPhotos => (ScrollAnchor::new(3.5, 1.0), ScrollAnchor::new(4.0, 0.5)),
            Self::PhotosToPlayground => {
                (ScrollAnchor::new(5.5, 1.0), ScrollAnchor::new(6.0, 0.5))
            }
        };
        PhaseWindow { start, end }
    }
}

#[derive(Clone, Debug)]
pub struct TransformPhase {
    pub id: PhaseId,
    pub window: PhaseWindow,
    pub timeline: Timeline<SceneKey>,
}

/// One complete keyframe set: the rest layout plus every phase, for a single viewport class.
#[derive(Clone, Debug)]
pub struct Choreography {
    breakpoint: Breakpoint,
    rest: SceneTransforms,
    phases: Vec<TransformPhase>,
}

impl Choreography {
    #[tracing::instrument(level = "debug")]
    pub fn for_breakpoint(breakpoint: Breakpoint) -> StageResult<Self> {
        let k = Keyframes::for_breakpoint(breakpoint);
        let phases = vec![
            TransformPhase {
                id: PhaseId::WorkToAbout,
                window: PhaseId::WorkToAbout.window(),
                timeline: work_to_about(&k)?,
            },
            TransformPhase {
                id: PhaseId::AboutToPhotos,
                window: PhaseId::AboutToPhotos.window(),
                timeline: about_to_photos(&k)?,
            },
            TransformPhase {
                id: PhaseId::PhotosToPlayground,
                window: PhaseId::PhotosToPlayground.window(),
                timeline: photos_to_playground(&k)?,
            },
        ];
        Ok(Self {
            breakpoint,
            rest: SceneTransforms::initial(breakpoint),
            phases,
        })
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn phases(&self) -> &[TransformPhase] {
        &self.phases
    }

    /// Reject windows that are inverted or overlap the previous phase.
    pub fn validate_windows(&self, distance_px: f64, viewport_px: f64) -> StageResult<()> {
        let mut prev_end = f64::NEG_INFINITY;
        for phase in &self.phases {
            let (s, e) = phase.window.range(distance_px, viewport_px);
            if e < s {
                return Err(StageError::validation(format!(
                    "phase {} window is inverted ({s} > {e})",
                    phase.id.name()
                )));
            }
            if s < prev_end {
                return Err(StageError::validation(format!(
                    "phase {} window starts at {s}, before the previous phase ends at {prev_end}",
                    phase.id.name()
                )));
            }
            prev_end = e;
        }
        Ok(())
    }

    /// Scene state for a scroll offset.
    pub fn sample(&self, offset: f64, distance_px: f64, viewport_px: f64) -> SceneTransforms {
        let mut scene = self.rest.clone();
        for phase in &self.phases {
            let p = phase.window.progress(offset, distance_px, viewport_px);
            phase.timeline.sample(p * phase.timeline.duration(), &mut scene);
        }
        scene
    }
}

/// Numbers that differ between the two viewport classes.
struct Keyframes {
    wa_group: [f32; 3],
    wa_group_rot_z: f32,
    wa_plate_first: &'static [(Channel, f32)],
    wa_plate_first_secs: f64,
    wa_plate_second: [f32; 3],
    wa_plate_second_secs: f64,

    ap_group: [f32; 3],
    ap_plate: [f32; 3],
    ap_plate_secs: f64,
    ap_group_flat: (f32, f32),
    /// Compact pulls the flattened group forward before the prisms regroup.
    ap_group_push_z: Option<f32>,
    ap_cluster: [(u8, f32, f32, Position); PRISM_COUNT],

    pp_group_first: (f32, f32),
    pp_group_second: (f32, f32),
    pp_spread_x: [f32; 4],
}

impl Keyframes {
    fn for_breakpoint(bp: Breakpoint) -> Self {
        let lag = Position::WithPrevious(0.0);
        match bp {
            Breakpoint::Compact => Self {
                wa_group: [-13.5, -13.0, 10.0],
                wa_group_rot_z: -0.7,
                wa_plate_first: &[(Channel::PosY, -6.0), (Channel::PosZ, -10.0)],
                wa_plate_first_secs: 0.5,
                wa_plate_second: [-10.0, -11.0, -21.0],
                wa_plate_second_secs: 1.1,

                ap_group: [1.0, -1.0, 10.0],
                ap_plate: [0.0, 0.0, 0.0],
                ap_plate_secs: 1.0,
                ap_group_flat: (-1.8, 4.0),
                ap_group_push_z: Some(8.6),
                ap_cluster: [
                    (1, -2.1, 0.7628, lag),
                    (5, 0.1, -1.8884, lag),
                    (0, 0.1, 0.7628, Position::WithPrevious(0.075)),
                    (6, -2.1, -1.8884, lag),
                    (2, 1.2, -0.5628, lag),
                    (3, -1.0, -0.5628, lag),
                    (4, -3.2, -0.5628, lag),
                ],

                pp_group_first: (-10.0, -6.0),
                pp_group_second: (0.0, -4.5),
                pp_spread_x: [-14.5, -17.0, -19.5, -22.0],
            },
            Breakpoint::Wide => Self {
                wa_group: [-12.32, -14.0, 1.6],
                wa_group_rot_z: -0.50265,
                wa_plate_first: &[
                    (Channel::PosX, -15.5),
                    (Channel::PosY, -1.2),
                    (Channel::PosZ, -19.0),
                ],
                wa_plate_first_secs: 0.6,
                wa_plate_second: [-14.8, -5.5, -19.0],
                wa_plate_second_secs: 0.6,

                ap_group: [1.0, -1.0, -0.9],
                ap_plate: [0.0, 0.0, -6.0],
                ap_plate_secs: 0.9,
                ap_group_flat: (-0.7, 1.66),
                ap_group_push_z: None,
                ap_cluster: [
                    (0, 2.6, -0.6628, Position::Append),
                    (1, 2.6, 0.6628, lag),
                    (2, 0.2, -0.6628, lag),
                    (3, -1.0, 0.6628, lag),
                    (4, -2.2, -0.6628, lag),
                    (5, -4.6, 0.6628, lag),
                    (6, -4.6, -0.6628, lag),
                ],

                pp_group_first: (-20.0, -1.0),
                pp_group_second: (-10.0, -1.0),
                pp_spread_x: [-18.5, -22.5, -26.5, -30.5],
            },
        }
    }
}

fn key(node: SceneNode, channel: Channel) -> SceneKey {
    SceneKey::new(node, channel)
}

fn prism(i: u8) -> SceneNode {
    SceneNode::Prism(i)
}

fn xyz(node: SceneNode, [x, y, z]: [f32; 3]) -> [(SceneKey, f32); 3] {
    [
        (key(node, Channel::PosX), x),
        (key(node, Channel::PosY), y),
        (key(node, Channel::PosZ), z),
    ]
}

fn on(node: SceneNode, values: &[(Channel, f32)]) -> Vec<(SceneKey, f32)> {
    values.iter().map(|&(c, v)| (key(node, c), v)).collect()
}

fn prisms_x(xs: [f32; PRISM_COUNT]) -> impl Iterator<Item = (u8, f32)> {
    (0u8..).zip(xs)
}

fn work_to_about(k: &Keyframes) -> StageResult<Timeline<SceneKey>> {
    let mut tl = Timeline::new();
    tl.to(&on(prism(0), &[(Channel::PosX, 4.0)]), 1.0, EASE_OUT, Position::Append)?;
    let fan = [1.8, -0.4, -2.6, -4.8, -7.0, -9.2];
    for (i, x) in (1u8..).zip(fan) {
        tl.to(
            &on(prism(i), &[(Channel::PosX, x), (Channel::RotZ, 0.0)]),
            1.0,
            EASE_OUT,
            Position::At(0.2 * f64::from(i)),
        )?;
    }
    let mut group = xyz(SceneNode::Group, k.wa_group).to_vec();
    group.push((key(SceneNode::Group, Channel::RotZ), k.wa_group_rot_z));
    tl.to(&group, 1.8, EASE_OUT, Position::At(0.8))?
        .to(
            &on(SceneNode::Plate, k.wa_plate_first),
            k.wa_plate_first_secs,
            EASE_OUT,
            Position::WithPrevious(0.0),
        )?
        .to(
            &xyz(SceneNode::Plate, k.wa_plate_second),
            k.wa_plate_second_secs,
            EASE_IN,
            Position::Append,
        )?;
    Ok(tl)
}

fn about_to_photos(k: &Keyframes) -> StageResult<Timeline<SceneKey>> {
    let lag = Position::WithPrevious(0.0);
    let mut tl = Timeline::new();

    let lift: Vec<Vec<(SceneKey, f32)>> = (0..PRISM_COUNT as u8)
        .map(|i| vec![(key(prism(i), Channel::PosY), 5.0)])
        .collect();
    tl.to_staggered(&lift, 1.0, EASE_OUT, Position::Append, 0.1)?
        .to(&xyz(SceneNode::Group, k.ap_group), 1.5, Ease::InOutCubic, lag)?
        .to(&xyz(SceneNode::Plate, k.ap_plate), k.ap_plate_secs, EASE_OUT, lag)?;
    for (i, x) in prisms_x([5.0, 3.0, 1.0, -1.0, -3.0, -5.0, -7.0]) {
        tl.to(&[(key(prism(i), Channel::PosX), x)], 1.5, Ease::OutCubic, lag)?;
    }

    tl.to(
        &[
            (key(SceneNode::Group, Channel::RotZ), 0.0),
            (key(SceneNode::Group, Channel::RotX), PI / 2.0),
        ],
        1.5,
        Ease::InOutCubic,
        Position::Append,
    )?
    .to(&[(key(SceneNode::Group, Channel::ScaleY), 0.001)], 1.5, EASE_OUT, lag)?
    .to(
        &[
            (key(SceneNode::Group, Channel::PosY), k.ap_group_flat.0),
            (key(SceneNode::Group, Channel::PosZ), k.ap_group_flat.1),
        ],
        1.5,
        EASE_OUT,
        lag,
    )?;

    let depth: Vec<(SceneKey, f32)> = (0..PRISM_COUNT as u8)
        .map(|i| (key(prism(i), Channel::ScaleZ), 1.0))
        .collect();
    tl.to(&depth, 1.0, EASE_OUT, Position::At(1.2))?;

    let mut first = true;
    for (i, x) in prisms_x([5.3, 3.2, 1.1, -1.0, -3.1, -5.2, -7.3]) {
        let at = if first { Position::Append } else { lag };
        first = false;
        tl.to(&[(key(prism(i), Channel::PosX), x)], 1.5, Ease::OutCubic, at)?;
    }

    if let Some(z) = k.ap_group_push_z {
        tl.to(
            &[(key(SceneNode::Group, Channel::PosZ), z)],
            1.5,
            EASE_OUT,
            Position::Append,
        )?;
    }
    for &(i, x, z, at) in &k.ap_cluster {
        tl.to(
            &on(prism(i), &[(Channel::PosX, x), (Channel::PosZ, z)]),
            1.5,
            Ease::OutCubic,
            at,
        )?;
    }
    Ok(tl)
}

fn photos_to_playground(k: &Keyframes) -> StageResult<Timeline<SceneKey>> {
    let lag = Position::WithPrevious(0.0);
    let step = Position::WithPrevious(0.1);
    let mut tl = Timeline::new();

    let (z, y) = k.pp_group_first;
    tl.to(
        &on(SceneNode::Group, &[(Channel::PosZ, z), (Channel::PosY, y)]),
        1.5,
        Ease::InOutCubic,
        Position::Append,
    )?
    .to(&[(key(SceneNode::Group, Channel::ScaleY), 1.0)], 1.5, Ease::InOutCubic, lag)?;

    let collapse = [3.485, 2.135, 0.7825, -0.5625, -1.9125, -3.2625, -4.6215];
    for (n, z) in collapse.into_iter().enumerate() {
        let i = (PRISM_COUNT - 1 - n) as u8;
        let at = if n == 0 { Position::At(0.3) } else { step };
        tl.to(
            &on(
                prism(i),
                &[
                    (Channel::PosZ, z),
                    (Channel::PosX, 0.0),
                    (Channel::RotZ, -PI / 2.0),
                    (Channel::ScaleX, 0.001),
                ],
            ),
            1.0,
            Ease::InOutCubic,
            at,
        )?;
    }

    let (z, y) = k.pp_group_second;
    tl.to(
        &on(SceneNode::Group, &[(Channel::PosZ, z), (Channel::PosY, y)]),
        1.5,
        Ease::InOutCubic,
        Position::Append,
    )?;
    let pairs: [&[u8]; 4] = [&[3], &[2, 4], &[1, 5], &[0, 6]];
    for (n, (ids, x)) in pairs.into_iter().zip(k.pp_spread_x).enumerate() {
        let at = if n == 0 { lag } else { step };
        let values: Vec<(SceneKey, f32)> = ids
            .iter()
            .map(|&i| (key(prism(i), Channel::PosX), x))
            .collect();
        tl.to(&values, 1.0, Ease::InOutCubic, at)?;
    }
    Ok(tl)
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/choreography.rs"]
mod tests;
