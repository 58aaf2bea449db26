use super::*;

#[test]
fn wide_media_is_cropped_horizontally_and_centered() {
    let fit = UvFit::for_media(Some((1920, 1080)));
    assert!((fit.scale.x - 0.5625).abs() < 1e-6);
    assert_eq!(fit.scale.y, 1.0);
    assert!((fit.offset.x - 0.21875).abs() < 1e-6);
    assert_eq!(fit.offset.y, 0.0);
    let mid = fit.apply(Vec2::splat(0.5));
    assert!((mid - Vec2::splat(0.5)).length() < 1e-6);
}

#[test]
fn tall_media_is_cropped_vertically() {
    let fit = UvFit::for_media(Some((500, 1000)));
    assert_eq!(fit.scale, Vec2::new(1.0, 0.5));
    assert_eq!(fit.offset, Vec2::new(0.0, 0.25));
}

#[test]
fn unknown_size_assumes_sixteen_by_nine() {
    assert_eq!(UvFit::for_media(None), UvFit::for_media(Some((16, 9))));
    assert_eq!(UvFit::for_media(Some((0, 0))), UvFit::for_media(None));
    assert_eq!(UvFit::for_media(Some((64, 64))), UvFit::IDENTITY);
}

#[test]
fn clear_keeps_time_only() {
    let mut m = PlateMaterial {
        progress: 0.7,
        fade_out: 0.2,
        time: 12.0,
        use_texture: true,
        ..PlateMaterial::default()
    };
    m.a.texture = Some(TextureId(1));
    m.clear();
    assert_eq!(m.progress, 0.0);
    assert_eq!(m.fade_out, 0.0);
    assert!(!m.use_texture);
    assert_eq!(m.a.texture, None);
    assert_eq!(m.time, 12.0);
}

#[test]
fn uniform_block_is_vec4_aligned_and_packs_params() {
    assert_eq!(std::mem::size_of::<PlateUniforms>() % 16, 0);
    let m = PlateMaterial {
        progress: 0.25,
        fade_out: 0.5,
        time: 3.0,
        use_texture: true,
        ..PlateMaterial::default()
    };
    let u = m.to_uniforms(Mat4::IDENTITY, Mat4::IDENTITY, true, false);
    assert_eq!(u.params, [0.25, 0.5, 3.0, 1.0]);
    assert_eq!(u.flags, [1.0, 0.0, 0.0, 0.0]);
    assert_eq!(bytemuck::bytes_of(&u).len(), std::mem::size_of::<PlateUniforms>());
}
