use tracing::{debug, warn};

use crate::{
    animation::scramble::Charset,
    config::{ScrollConfig, StageConfig, TextConfig},
    foundation::{
        core::{Breakpoint, Shared, Viewport},
        error::{StageError, StageResult},
        math::mix_seed,
    },
    render::scene::SceneTransforms,
    scroll::{
        choreography::Choreography,
        document::{TextDocument, TextTarget},
        reveal::{SectionText, TextRun},
        section::{SectionEvent, SectionMap, SectionTracker},
        surface::ScrollSurface,
    },
};

/// Where a section jump was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpOrigin {
    /// In-page anchors and the compact menu, one section distance per half step.
    Anchor,
    /// The wide-layout header, one viewport per half step.
    Header,
}

/// Maps the scroll offset to section text transitions and to the compositor's scene state.
pub struct ScrollPhaseEngine {
    scroll_cfg: ScrollConfig,
    text_cfg: TextConfig,
    jump_secs: f64,
    charset: Charset,
    seed: u64,
    runs_started: u64,

    viewport: Viewport,
    breakpoint: Breakpoint,
    offset: f64,
    tracker: SectionTracker,
    sections: Vec<Option<SectionText>>,
    labels: Vec<String>,
    label_run: Option<TextRun>,
    choreography: Choreography,

    document: Shared<dyn TextDocument>,
    scene: Shared<SceneTransforms>,
    surface: Shared<dyn ScrollSurface>,
}

impl ScrollPhaseEngine {
    /// Register every section found in `document` and pose the scene for the current offset.
    ///
    /// Sections missing from the document are skipped; their thresholds still count.
    #[tracing::instrument(skip_all, fields(width = viewport.width, height = viewport.height))]
    pub fn new(
        cfg: &StageConfig,
        viewport: Viewport,
        document: Shared<dyn TextDocument>,
        scene: Shared<SceneTransforms>,
        surface: Shared<dyn ScrollSurface>,
    ) -> StageResult<Self> {
        let charset = cfg.text.charset(cfg.seed)?;
        let breakpoint = viewport.breakpoint(cfg.scroll.wide_from_px);
        let choreography = Choreography::for_breakpoint(breakpoint)?;
        let distance = cfg.scroll.section_distance_vh * viewport.height;
        choreography.validate_windows(distance, viewport.height)?;

        let map = SectionMap::new(cfg.sections.len(), viewport.height, &cfg.scroll)?;
        let offset = surface.borrow().offset();
        let tracker = SectionTracker::new(map, offset);
        let active = tracker.current();

        let mut sections = Vec::with_capacity(cfg.sections.len());
        {
            let mut doc = document.borrow_mut();
            for (i, s) in cfg.sections.iter().enumerate() {
                let Some(mut text) = SectionText::register(&*doc, &s.name) else {
                    warn!(section = %s.name, "section has no text elements in the document, skipping");
                    sections.push(None);
                    continue;
                };
                if i != active {
                    text.clear(&mut *doc);
                }
                sections.push(Some(text));
            }
            if let Some(s) = cfg.sections.get(active) {
                doc.set_text(TextTarget::Label, &s.label);
            }
        }

        let engine = Self {
            scroll_cfg: cfg.scroll.clone(),
            text_cfg: cfg.text.clone(),
            jump_secs: cfg.smooth_scroll.jump_secs,
            charset,
            seed: cfg.seed,
            runs_started: 0,
            viewport,
            breakpoint,
            offset,
            tracker,
            sections,
            labels: cfg.sections.iter().map(|s| s.label.clone()).collect(),
            label_run: None,
            choreography,
            document,
            scene,
            surface,
        };
        engine.write_scene();
        debug!(active, registered = engine.registered_count(), "scroll engine ready");
        Ok(engine)
    }

    pub fn active_section(&self) -> usize {
        self.tracker.current()
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Sections that were found in the document.
    pub fn registered_count(&self) -> usize {
        self.sections.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_label_running(&self) -> bool {
        self.label_run.is_some()
    }

    /// One section distance in pixels.
    pub fn section_distance(&self) -> f64 {
        self.scroll_cfg.section_distance_vh * self.viewport.height
    }

    /// Feed a new scroll offset. Returns the crossings it caused, in order.
    pub fn on_scroll(&mut self, offset: f64) -> Vec<SectionEvent> {
        self.offset = offset;
        let events = self.tracker.advance(offset);
        for &ev in &events {
            self.apply(ev);
        }
        self.write_scene();
        events
    }

    /// Recompute thresholds and projection-independent scene state for a new viewport.
    ///
    /// A change of viewport class swaps the whole keyframe set and tears down the compact label
    /// run when leaving the compact class. Running text runs are not interrupted.
    #[tracing::instrument(skip(self), fields(width = viewport.width, height = viewport.height))]
    pub fn on_resize(&mut self, viewport: Viewport) -> StageResult<Vec<SectionEvent>> {
        let map = SectionMap::new(self.sections.len(), viewport.height, &self.scroll_cfg)?;
        let breakpoint = viewport.breakpoint(self.scroll_cfg.wide_from_px);
        if breakpoint != self.breakpoint {
            let next = Choreography::for_breakpoint(breakpoint)?;
            next.validate_windows(
                self.scroll_cfg.section_distance_vh * viewport.height,
                viewport.height,
            )?;
            self.choreography = next;
            if breakpoint != Breakpoint::Compact {
                self.label_run = None;
            }
            debug!(?breakpoint, "viewport class changed");
            self.breakpoint = breakpoint;
        }
        self.viewport = viewport;
        self.tracker.set_map(map);
        let events = self.tracker.advance(self.offset);
        for &ev in &events {
            self.apply(ev);
        }
        self.write_scene();
        Ok(events)
    }

    /// Advance every running text run by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        let mut doc = self.document.borrow_mut();
        for s in self.sections.iter_mut().flatten() {
            s.tick(dt, &mut *doc, &self.charset);
        }
        if let Some(run) = self.label_run.as_mut() {
            if run.advance(dt, &mut *doc, &self.charset) {
                self.label_run = None;
            }
        }
    }

    /// Offset at which section `index` sits.
    pub fn jump_target(&self, index: usize) -> StageResult<f64> {
        self.jump_target_from(index, JumpOrigin::Anchor)
    }

    /// Offset at which section `index` sits, measured the way `origin` measures it.
    pub fn jump_target_from(&self, index: usize, origin: JumpOrigin) -> StageResult<f64> {
        if index >= self.sections.len() {
            return Err(StageError::validation(format!(
                "section {index} out of range (have {})",
                self.sections.len()
            )));
        }
        let distance = match origin {
            JumpOrigin::Anchor => self.section_distance(),
            JumpOrigin::Header => self.viewport.height,
        };
        Ok(2.0 * index as f64 * distance)
    }

    /// Glide the scroll surface to section `index`.
    pub fn jump_to(&mut self, index: usize) -> StageResult<()> {
        self.jump_from(index, JumpOrigin::Anchor)
    }

    /// Glide to section `index` from `origin`. A stopped surface drops the jump.
    pub fn jump_from(&mut self, index: usize, origin: JumpOrigin) -> StageResult<()> {
        let target = self.jump_target_from(index, origin)?;
        let mut surface = self.surface.borrow_mut();
        if surface.is_stopped() {
            debug!(index, target, ?origin, "section jump dropped while scroll is stopped");
            return Ok(());
        }
        debug!(index, target, ?origin, "jumping to section");
        surface.scroll_to(target, self.jump_secs);
        Ok(())
    }

    fn next_seed(&mut self) -> u64 {
        self.runs_started += 1;
        mix_seed(self.seed, self.runs_started)
    }

    fn apply(&mut self, ev: SectionEvent) {
        let idx = ev.section();
        let seed = self.next_seed();
        let mut doc = self.document.borrow_mut();
        let Some(section) = self.sections.get_mut(idx).and_then(Option::as_mut) else {
            debug!(?ev, "crossing for unregistered section");
            return;
        };
        debug!(?ev, section = section.name(), "section crossing");
        if ev.is_enter() {
            section.restart_reveal(&mut *doc, &self.text_cfg, seed);
            if self.breakpoint == Breakpoint::Compact {
                if let Some(label) = self.labels.get(idx) {
                    self.label_run = Some(TextRun::reveal(
                        &*doc,
                        &[(TextTarget::Label, label.clone())],
                        self.text_cfg.label_secs,
                        0.0,
                        &self.text_cfg,
                        mix_seed(seed, u64::MAX),
                    ));
                }
            }
        } else {
            section.restart_hide(&mut *doc, &self.text_cfg, seed);
        }
    }

    fn write_scene(&self) {
        let sampled =
            self.choreography
                .sample(self.offset, self.section_distance(), self.viewport.height);
        *self.scene.borrow_mut() = sampled;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/engine.rs"]
mod tests;
