//! The page-facing entry point: one object owning the scroll engine, compositor, hover
//! transitions and overlay, with every collaborator passed in explicitly.

use crate::{
    config::StageConfig,
    content::ContentManifest,
    foundation::{
        core::{Shared, Viewport, shared},
        error::StageResult,
    },
    input::{
        events::{EventOutcome, KeyInput, TouchInput, WheelInput},
        guard::Panel,
        overlay::{ProjectOverlay, Sibling},
        scroll_lock::{PageStyle, Platform, ScrollLock},
    },
    media::{
        pool::{MediaFactory, ResourcePool},
        transition::{TransitionEvent, VideoTransitionController},
    },
    render::{
        backend::{FrameRGBA, PassBackend},
        compositor::Compositor,
        scene::SceneTransforms,
        uniforms::PlateMaterial,
    },
    scroll::{
        document::TextDocument, engine::{JumpOrigin, ScrollPhaseEngine}, section::SectionEvent,
        surface::ScrollSurface,
    },
};

/// Host capabilities the stage drives.
pub struct StageHost {
    pub document: Shared<dyn TextDocument>,
    pub surface: Shared<dyn ScrollSurface>,
    pub page: Shared<dyn PageStyle>,
    pub media: Box<dyn MediaFactory>,
    pub platform: Platform,
}

/// What one [`Stage::advance`] step changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Section crossings caused by scroll-surface motion during the step.
    pub sections: Vec<SectionEvent>,
    pub transition: Option<TransitionEvent>,
}

pub struct Stage {
    engine: ScrollPhaseEngine,
    compositor: Compositor,
    transitions: VideoTransitionController,
    overlay: ProjectOverlay,
    surface: Shared<dyn ScrollSurface>,
    pool: Shared<ResourcePool>,
    elapsed: f64,
}

impl Stage {
    #[tracing::instrument(skip_all, fields(width = viewport.width, height = viewport.height))]
    pub fn new(
        cfg: &StageConfig,
        content: &ContentManifest,
        viewport: Viewport,
        host: StageHost,
    ) -> StageResult<Self> {
        cfg.validate()?;
        content.validate()?;

        let breakpoint = viewport.breakpoint(cfg.scroll.wide_from_px);
        let scene = shared(SceneTransforms::initial(breakpoint));
        let material = shared(PlateMaterial::default());

        let engine = ScrollPhaseEngine::new(
            cfg,
            viewport,
            host.document,
            scene.clone(),
            host.surface.clone(),
        )?;
        let compositor = Compositor::new(viewport, scene, material.clone());

        let pool = shared(ResourcePool::from_manifest(
            content,
            cfg.transition.max_slots,
            host.media,
        ));
        let transitions =
            VideoTransitionController::new(&cfg.transition, cfg.seed, pool.clone(), material);

        let panels = content
            .slugs()
            .into_iter()
            .map(|slug| Panel::new(slug, viewport.height, viewport.height))
            .collect();
        let overlay = ProjectOverlay::new(
            panels,
            ScrollLock::new(host.surface.clone(), host.platform),
            cfg.input.clone(),
            viewport.height,
            host.page,
        );

        tracing::debug!(
            slots = pool.borrow().slot_count(),
            panels = content.entries.len(),
            "stage ready"
        );
        Ok(Self {
            engine,
            compositor,
            transitions,
            overlay,
            surface: host.surface,
            pool,
            elapsed: 0.0,
        })
    }

    pub fn engine(&self) -> &ScrollPhaseEngine {
        &self.engine
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn transitions(&self) -> &VideoTransitionController {
        &self.transitions
    }

    pub fn overlay(&self) -> &ProjectOverlay {
        &self.overlay
    }

    pub fn pool(&self) -> &Shared<ResourcePool> {
        &self.pool
    }

    pub fn material(&self) -> Shared<PlateMaterial> {
        self.compositor.material_handle()
    }

    pub fn scene(&self) -> Shared<SceneTransforms> {
        self.compositor.scene_handle()
    }

    /// Seconds advanced so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn open_overlay(&mut self, id: &str) -> bool {
        self.overlay.open(id)
    }

    pub fn close_overlay(&mut self) {
        self.overlay.close();
    }

    pub fn go_to_sibling(&mut self, dir: Sibling) -> bool {
        self.overlay.open_sibling(dir)
    }

    /// Layout metrics of a panel, as measured by the host.
    pub fn set_panel_metrics(&mut self, slug: &str, client_height: f64, scroll_height: f64) {
        if let Some(p) = self.overlay.panel_mut(slug) {
            p.client_height = client_height;
            p.scroll_height = scroll_height;
            let top = p.scroll_top();
            p.set_scroll_top(top);
        }
    }

    pub fn on_hover_enter(&mut self, slot: usize) {
        self.transitions.enter(slot);
    }

    pub fn on_hover_leave(&mut self) {
        self.transitions.leave();
    }

    /// Scroll notification from the host. Ignored while the page is locked.
    pub fn on_scroll(&mut self, offset: f64) -> Vec<SectionEvent> {
        if self.overlay.is_locked() {
            return Vec::new();
        }
        self.surface.borrow_mut().set_offset(offset);
        self.sync_scroll()
    }

    pub fn on_resize(&mut self, viewport: Viewport) -> StageResult<Vec<SectionEvent>> {
        let events = self.engine.on_resize(viewport)?;
        self.compositor.resize(viewport);
        self.overlay.set_viewport_height(viewport.height);
        Ok(events)
    }

    /// Glide to a section. Ignored while the overlay is open.
    pub fn jump_to_section(&mut self, index: usize) -> StageResult<()> {
        self.jump_to_section_from(index, JumpOrigin::Anchor)
    }

    pub fn jump_to_section_from(&mut self, index: usize, origin: JumpOrigin) -> StageResult<()> {
        if self.overlay.is_locked() {
            tracing::debug!(index, ?origin, "section jump ignored while overlay is open");
            return Ok(());
        }
        self.engine.jump_from(index, origin)
    }

    /// Wheel over the page. The overlay captures it while open; otherwise it scrolls the
    /// page surface.
    pub fn on_wheel(&mut self, ev: &WheelInput) -> EventOutcome {
        if self.overlay.is_open() {
            return self.overlay.on_wheel(ev);
        }
        let delta = self.overlay.guard().normalize_wheel(ev.delta_y, ev.mode);
        let smooth = {
            let mut s = self.surface.borrow_mut();
            s.user_scroll(delta);
            s.is_smooth()
        };
        self.sync_scroll();
        if smooth {
            EventOutcome::PREVENT
        } else {
            EventOutcome::PASS
        }
    }

    pub fn on_keydown(&mut self, ev: &KeyInput) -> EventOutcome {
        self.overlay.on_keydown(ev)
    }

    pub fn on_touchmove(&mut self, ev: &TouchInput) -> EventOutcome {
        self.overlay.on_touchmove(ev)
    }

    /// Advance smooth scroll, text runs and the hover transition by `dt` seconds.
    pub fn advance(&mut self, dt: f64) -> StepReport {
        self.elapsed += dt.max(0.0);
        self.surface.borrow_mut().tick(dt);
        let sections = self.sync_scroll();
        self.engine.tick(dt);
        let transition = self.transitions.tick(dt);
        StepReport {
            sections,
            transition,
        }
    }

    /// [`Stage::advance`], then draw.
    pub fn frame<B: PassBackend + ?Sized>(
        &mut self,
        dt: f64,
        backend: &mut B,
    ) -> StageResult<FrameRGBA> {
        self.advance(dt);
        self.render(backend)
    }

    /// Draw the current state without advancing time.
    pub fn render<B: PassBackend + ?Sized>(&mut self, backend: &mut B) -> StageResult<FrameRGBA> {
        let pool = self.pool.borrow();
        self.compositor.render_frame(backend, &*pool)
    }

    /// Stop all media and release it. The stage keeps scrolling but hover does nothing.
    pub fn teardown(&mut self) {
        self.overlay.close();
        self.transitions.dispose();
    }

    fn sync_scroll(&mut self) -> Vec<SectionEvent> {
        let offset = self.surface.borrow().offset();
        if offset == self.engine.offset() {
            return Vec::new();
        }
        self.engine.on_scroll(offset)
    }
}
