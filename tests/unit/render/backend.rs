use super::*;
use crate::render::scene::{MaskGeometry, PlateGeometry};

#[derive(Default)]
struct RecordingBackend {
    calls: Vec<&'static str>,
    size: (u32, u32),
}

impl PassBackend for RecordingBackend {
    fn begin_frame(&mut self, width: u32, height: u32) -> StageResult<()> {
        self.calls.push("begin");
        self.size = (width, height);
        Ok(())
    }

    fn draw_mask(&mut self, pass: &MaskPass<'_>) -> StageResult<()> {
        assert_eq!(pass.models.len(), 2);
        self.calls.push("mask");
        Ok(())
    }

    fn draw_plate(&mut self, _pass: &PlatePass<'_>, frames: &dyn FrameSource) -> StageResult<()> {
        assert!(frames.frame(TextureId(0)).is_none());
        self.calls.push("plate");
        Ok(())
    }

    fn reset(&mut self) -> StageResult<()> {
        self.calls.push("reset");
        Ok(())
    }

    fn readback(&mut self) -> StageResult<FrameRGBA> {
        self.calls.push("readback");
        Ok(FrameRGBA {
            width: self.size.0,
            height: self.size.1,
            data: vec![0; (self.size.0 * self.size.1 * 4) as usize],
        })
    }
}

#[test]
fn passes_run_in_fixed_order() {
    let mask_geo = MaskGeometry::default();
    let plate_geo = PlateGeometry::default();
    let material = PlateMaterial::default();
    let models = [Mat4::IDENTITY; 2];
    let mut backend = RecordingBackend::default();
    let frame = execute_frame(
        &mut backend,
        (4, 3),
        &MaskPass {
            view_proj: Mat4::IDENTITY,
            models: &models,
            mesh: &mask_geo.prism,
        },
        &PlatePass {
            view_proj: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
            mesh: &plate_geo.quad,
            material: &material,
        },
        &NoFrames,
    )
    .unwrap();
    assert_eq!(
        backend.calls,
        vec!["begin", "mask", "plate", "reset", "readback"]
    );
    assert_eq!(frame.pixel(3, 2), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(4, 0), None);
}
