use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    content::ContentManifest,
    foundation::{
        core::Rgb,
        error::{StageError, StageResult},
    },
    media::color::ColorSampler,
    render::{backend::FrameSource, uniforms::TextureId},
};

/// A play request the runtime refused. The slot stays usable and a later `enter` retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("playback rejected: {reason}")]
pub struct PlaybackError {
    pub reason: String,
}

impl PlaybackError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A looping, muted media resource behind one hover slot.
pub trait MediaElement {
    /// Seek to the start and play, looped.
    fn play_from_start(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    fn is_playing(&self) -> bool;

    /// Decoded frame size, once known.
    fn native_size(&self) -> Option<(u32, u32)>;

    /// The most recently decoded frame, straight RGBA8.
    fn current_frame(&self) -> Option<&image::RgbaImage>;
}

/// Creates the media element for a slot's source on first use.
pub trait MediaFactory {
    fn create(&mut self, slot: usize, source: &str) -> StageResult<Box<dyn MediaElement>>;
}

/// Still image treated as a one-frame looping medium.
#[derive(Debug, Clone)]
pub struct StillMedia {
    frame: image::RgbaImage,
    playing: bool,
}

impl StillMedia {
    pub fn new(frame: image::RgbaImage) -> Self {
        Self {
            frame,
            playing: false,
        }
    }

    pub fn open(path: &Path) -> StageResult<Self> {
        let img = image::open(path)
            .with_context(|| format!("decode still media '{}'", path.display()))?;
        Ok(Self::new(img.to_rgba8()))
    }
}

impl MediaElement for StillMedia {
    fn play_from_start(&mut self) -> Result<(), PlaybackError> {
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn native_size(&self) -> Option<(u32, u32)> {
        Some(self.frame.dimensions())
    }

    fn current_frame(&self) -> Option<&image::RgbaImage> {
        Some(&self.frame)
    }
}

/// Resolves sources as image files relative to a base directory.
#[derive(Debug, Clone)]
pub struct StillFileFactory {
    base_dir: PathBuf,
}

impl StillFileFactory {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl MediaFactory for StillFileFactory {
    fn create(&mut self, _slot: usize, source: &str) -> StageResult<Box<dyn MediaElement>> {
        let path = self.base_dir.join(source);
        Ok(Box::new(StillMedia::open(&path)?))
    }
}

struct MediaSlot {
    source: Option<String>,
    media: Option<Box<dyn MediaElement>>,
    /// Last dominant color sampled from a readable frame.
    last_color: Option<Rgb>,
}

/// Media elements for the hover slots.
///
/// Elements are created on first acquire and then kept for the session: a slot is never
/// re-created, and everything is released together by [`ResourcePool::dispose_all`].
pub struct ResourcePool {
    slots: Vec<MediaSlot>,
    factory: Box<dyn MediaFactory>,
    disposed: bool,
}

impl ResourcePool {
    pub fn new(sources: Vec<Option<String>>, factory: Box<dyn MediaFactory>) -> Self {
        Self {
            slots: sources
                .into_iter()
                .map(|source| MediaSlot {
                    source,
                    media: None,
                    last_color: None,
                })
                .collect(),
            factory,
            disposed: false,
        }
    }

    pub fn from_manifest(
        manifest: &ContentManifest,
        max_slots: usize,
        factory: Box<dyn MediaFactory>,
    ) -> Self {
        Self::new(manifest.media_slots(max_slots), factory)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn source(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot)?.source.as_deref()
    }

    pub fn is_materialized(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(|s| s.media.is_some())
    }

    pub fn materialized_count(&self) -> usize {
        self.slots.iter().filter(|s| s.media.is_some()).count()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Media for `slot`, creating it on first use.
    ///
    /// `None` when [`ResourcePool::check_slot`] rejects the slot or creation failed (logged;
    /// the next acquire tries again).
    pub fn acquire(&mut self, slot: usize) -> Option<&mut Box<dyn MediaElement>> {
        if let Err(e) = self.check_slot(slot) {
            tracing::debug!(slot, error = %e, "media slot unavailable");
            return None;
        }
        let entry = self.slots.get_mut(slot)?;
        if entry.media.is_none() {
            let source = entry.source.as_deref()?;
            match self.factory.create(slot, source) {
                Ok(media) => {
                    tracing::debug!(slot, source, "media slot materialized");
                    entry.media = Some(media);
                }
                Err(e) => {
                    tracing::warn!(slot, source, error = %e, "media slot creation failed");
                    return None;
                }
            }
        }
        entry.media.as_mut()
    }

    /// Already-created media, without creating anything.
    pub fn media(&self, slot: usize) -> Option<&dyn MediaElement> {
        self.slots.get(slot)?.media.as_deref()
    }

    pub fn media_mut(&mut self, slot: usize) -> Option<&mut Box<dyn MediaElement>> {
        self.slots.get_mut(slot)?.media.as_mut()
    }

    /// Texture handle of a created slot.
    pub fn texture(&self, slot: usize) -> Option<TextureId> {
        self.is_materialized(slot).then_some(TextureId(slot))
    }

    pub fn pause(&mut self, slot: usize) {
        if let Some(m) = self.media_mut(slot) {
            m.pause();
        }
    }

    /// Full teardown: pause and drop every element. The pool hands out nothing afterwards.
    pub fn dispose_all(&mut self) {
        for s in &mut self.slots {
            if let Some(mut m) = s.media.take() {
                m.pause();
            }
        }
        self.disposed = true;
    }

    /// Dominant color of a created slot.
    ///
    /// A frame that cannot be sampled yields the slot's last good color, then the sampler's
    /// fallback.
    pub fn dominant_color(&mut self, slot: usize, sampler: &ColorSampler) -> Rgb {
        let Some(entry) = self.slots.get_mut(slot) else {
            return sampler.fallback();
        };
        let Some(media) = entry.media.as_deref() else {
            return entry.last_color.unwrap_or(sampler.fallback());
        };
        match sampler.sample(media) {
            Ok(color) => {
                entry.last_color = Some(color);
                color
            }
            Err(e) => {
                tracing::debug!(
                    slot,
                    error = %e,
                    cached = entry.last_color.is_some(),
                    "color sample failed"
                );
                entry.last_color.unwrap_or(sampler.fallback())
            }
        }
    }

    /// Whether `slot` can hand out media: in range, backed by a source, pool still live.
    pub fn check_slot(&self, slot: usize) -> StageResult<()> {
        if self.disposed {
            return Err(StageError::media("media pool was disposed"));
        }
        let Some(entry) = self.slots.get(slot) else {
            return Err(StageError::media(format!(
                "media slot {slot} out of range (0..{})",
                self.slots.len()
            )));
        };
        if entry.source.is_none() {
            return Err(StageError::media(format!("media slot {slot} has no source")));
        }
        Ok(())
    }
}

impl FrameSource for ResourcePool {
    fn frame(&self, id: TextureId) -> Option<&image::RgbaImage> {
        self.media(id.0)?.current_frame()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/pool.rs"]
mod tests;
