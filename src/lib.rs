#![forbid(unsafe_code)]

mod animation;
mod config;
mod content;
mod foundation;
mod input;
mod media;
mod render;
mod scroll;
mod stage;

pub use animation::{
    ease::Ease,
    scramble::{BUILTIN_CHARSETS, Charset, ScrambleText},
    timeline::{ChannelState, Position, Timeline},
    tween::{Tween, TweenStep},
};
pub use config::{
    InputConfig, MAX_MEDIA_SLOTS, ScrollConfig, SectionConfig, SmoothScrollConfig, StageConfig,
    TextConfig, TransitionConfig, default_sections,
};
pub use content::{ContentManifest, ImageDescriptor, PortfolioEntry};
pub use foundation::{
    core::{Breakpoint, Mat4, Pose, Quat, Rgb, Shared, Vec2, Vec3, Vec4, Viewport, shared},
    error::{StageError, StageResult},
    math::{Rng64, mix_seed},
};
pub use input::{
    events::{
        DeltaMode, EventOutcome, EventTarget, Key, KeyInput, Region, TouchInput, WheelInput,
    },
    guard::{KeyOutcome, ModalInputGuard, Panel},
    overlay::{ProjectOverlay, Sibling},
    scroll_lock::{BodyStyle, LockSnapshot, MemoryPage, PageStyle, Platform, ScrollLock},
};
pub use media::{
    color::{ColorSampler, MAX_SAMPLE_GRID, SampleError},
    pool::{
        MediaElement, MediaFactory, PlaybackError, ResourcePool, StillFileFactory, StillMedia,
    },
    transition::{TransitionEvent, TransitionState, VideoTransitionController},
};
pub use render::{
    backend::{
        FrameRGBA, FrameSource, MASK_REF, MaskPass, NoFrames, PassBackend, PlatePass, StencilPass,
        execute_frame,
    },
    camera::Camera,
    compositor::Compositor,
    cpu::CpuBackend,
    scene::{
        Channel, MaskGeometry, Mesh, PLATE_SIZE, PRISM_COUNT, PRISM_SIZE, PlateGeometry, SceneKey,
        SceneNode, SceneTransforms,
    },
    shading::{dissolve, shade_plate},
    uniforms::{MaskUniforms, PlateMaterial, PlateSource, PlateUniforms, TextureId, UvFit},
};
#[cfg(feature = "gpu")]
pub use render::gpu::GpuBackend;
pub use scroll::{
    choreography::{Choreography, PhaseId, PhaseWindow, ScrollAnchor, TransformPhase},
    document::{ElementId, MemoryDocument, TextDocument, TextTarget},
    engine::{JumpOrigin, ScrollPhaseEngine},
    reveal::{RunKind, SectionText, TextRun},
    section::{Direction, SectionEvent, SectionMap, SectionTracker},
    surface::{NativeScroll, ScrollSurface, SmoothScroll},
};
pub use stage::{Stage, StageHost, StepReport};
