use crate::{
    foundation::{
        core::{Shared, Viewport},
        error::StageResult,
    },
    render::{
        backend::{FrameRGBA, FrameSource, MaskPass, PassBackend, PlatePass, execute_frame},
        camera::Camera,
        scene::{MaskGeometry, PlateGeometry, SceneTransforms},
        uniforms::PlateMaterial,
    },
};

/// Draws the plate through the prism mask.
///
/// Holds no timing state: poses come from the scroll engine through the shared scene, and
/// shader state from the transition controller through the shared material.
pub struct Compositor {
    viewport: Viewport,
    camera: Camera,
    mask: MaskGeometry,
    plate: PlateGeometry,
    scene: Shared<SceneTransforms>,
    material: Shared<PlateMaterial>,
}

impl Compositor {
    pub fn new(
        viewport: Viewport,
        scene: Shared<SceneTransforms>,
        material: Shared<PlateMaterial>,
    ) -> Self {
        let camera_z = scene.borrow().camera_z;
        Self {
            viewport,
            camera: Camera::new(viewport, camera_z),
            mask: MaskGeometry::default(),
            plate: PlateGeometry::default(),
            scene,
            material,
        }
    }

    pub fn scene_handle(&self) -> Shared<SceneTransforms> {
        self.scene.clone()
    }

    pub fn material_handle(&self) -> Shared<PlateMaterial> {
        self.material.clone()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// New projection aspect and draw-buffer size. Scene and material are left alone.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_viewport(viewport);
    }

    #[tracing::instrument(skip_all, fields(width = self.viewport.width, height = self.viewport.height))]
    pub fn render_frame<B: PassBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        frames: &dyn FrameSource,
    ) -> StageResult<FrameRGBA> {
        let (prism_models, plate_model) = {
            let scene = self.scene.borrow();
            self.camera.z = scene.camera_z;
            (scene.prism_models(), scene.plate_model())
        };
        let material = *self.material.borrow();
        let view_proj = self.camera.view_proj();

        execute_frame(
            backend,
            self.viewport.pixel_size(),
            &MaskPass {
                view_proj,
                models: &prism_models,
                mesh: &self.mask.prism,
            },
            &PlatePass {
                view_proj,
                model: plate_model,
                mesh: &self.plate.quad,
                material: &material,
            },
            frames,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
