pub(crate) mod backend;
pub(crate) mod camera;
pub(crate) mod compositor;
pub(crate) mod cpu;
#[cfg(feature = "gpu")]
pub(crate) mod gpu;
pub(crate) mod scene;
pub(crate) mod shading;
pub(crate) mod uniforms;
