//! Tunables for the whole stage, loaded from JSON.
//!
//! Every section carries `#[serde(default)]`, so a config file only has to mention what it
//! changes.

use serde::{Deserialize, Serialize};

use crate::{
    animation::{ease::Ease, scramble::Charset},
    foundation::{
        core::Rgb,
        error::{StageError, StageResult},
    },
    media::color::MAX_SAMPLE_GRID,
};

/// Root configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageConfig {
    /// Scroll geometry and breakpoint.
    pub scroll: ScrollConfig,
    /// Text scramble timings.
    pub text: TextConfig,
    /// Hover video crossfade.
    pub transition: TransitionConfig,
    /// Overlay input handling.
    pub input: InputConfig,
    /// Smooth-scroll backend.
    pub smooth_scroll: SmoothScrollConfig,
    /// Sections in scroll order.
    pub sections: Vec<SectionConfig>,
    /// Seed for scramble glyphs and shader noise.
    pub seed: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// One section distance, as a multiple of the viewport height.
    pub section_distance_vh: f64,
    /// Backward thresholds sit this far (in viewport heights) before the forward ones.
    pub hysteresis_vh: f64,
    /// Viewports at least this wide use the wide keyframe set.
    pub wide_from_px: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            section_distance_vh: 1.5,
            hysteresis_vh: 0.02,
            wide_from_px: 1024.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    pub reveal_secs: f64,
    /// Delay between consecutive elements when revealing.
    pub reveal_stagger_secs: f64,
    /// Total stagger spread across all elements when hiding (last element first).
    pub hide_stagger_total_secs: f64,
    pub label_secs: f64,
    /// How often unrevealed glyphs change.
    pub reroll_secs: f64,
    /// Explicit glyph set; when absent one of the built-in sets is picked from the seed.
    pub charset: Option<String>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            reveal_secs: 0.65,
            reveal_stagger_secs: 0.035,
            hide_stagger_total_secs: 0.035,
            label_secs: 0.6,
            reroll_secs: 1.0 / 30.0,
            charset: None,
        }
    }
}

impl TextConfig {
    pub fn charset(&self, seed: u64) -> StageResult<Charset> {
        match &self.charset {
            Some(s) => Charset::new(s),
            None => Ok(Charset::pick_builtin(seed)),
        }
    }
}

/// Hoverable media slots never exceed this.
pub const MAX_MEDIA_SLOTS: usize = 7;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionConfig {
    pub duration_secs: f64,
    pub ease: Ease,
    /// Gray level used when a frame cannot be sampled.
    pub fallback_gray: f32,
    /// Side of the grid the frame is averaged down to.
    pub sample_grid: u32,
    /// Upper bound on hoverable media slots.
    pub max_slots: usize,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_secs: 1.0,
            ease: Ease::OutQuad,
            fallback_gray: 0.5,
            sample_grid: 8,
            max_slots: MAX_MEDIA_SLOTS,
        }
    }
}

impl TransitionConfig {
    pub fn fallback_color(&self) -> Rgb {
        Rgb::gray(self.fallback_gray)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Pixels per wheel line.
    pub wheel_line_px: f64,
    pub arrow_step_px: f64,
    /// Page step as a fraction of the panel's visible height.
    pub page_fraction: f64,
    pub page_floor_px: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            wheel_line_px: 16.0,
            arrow_step_px: 48.0,
            page_fraction: 0.9,
            page_floor_px: 120.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoothScrollConfig {
    pub enabled: bool,
    pub duration_secs: f64,
    /// Duration of programmatic jumps to a section.
    pub jump_secs: f64,
    pub ease: Ease,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_secs: 1.2,
            jump_secs: 3.5,
            ease: Ease::OutExpo,
        }
    }
}

/// One scroll section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionConfig {
    /// Document key of the section container.
    pub name: String,
    /// Compact label shown on narrow viewports.
    pub label: String,
}

impl SectionConfig {
    fn new(name: &str, label: &str) -> Self {
        Self {
            name: name.to_owned(),
            label: label.to_owned(),
        }
    }
}

/// Sections of the portfolio page, in scroll order.
pub fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new("works-info", "Works"),
        SectionConfig::new("about-area", "About"),
        SectionConfig::new("photos-area", "Photos"),
        SectionConfig::new("playground-area", "Playground"),
    ]
}

impl StageConfig {
    pub fn from_json_str(s: &str) -> StageResult<Self> {
        let mut cfg: Self =
            serde_json::from_str(s).map_err(|e| StageError::config(e.to_string()))?;
        if cfg.sections.is_empty() {
            cfg.sections = default_sections();
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults with the portfolio sections filled in.
    pub fn portfolio() -> Self {
        Self {
            sections: default_sections(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> StageResult<()> {
        fn positive(name: &str, v: f64) -> StageResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(StageError::config(format!("{name} must be > 0, got {v}")))
            }
        }
        fn non_negative(name: &str, v: f64) -> StageResult<()> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(StageError::config(format!("{name} must be >= 0, got {v}")))
            }
        }

        positive("scroll.section_distance_vh", self.scroll.section_distance_vh)?;
        non_negative("scroll.hysteresis_vh", self.scroll.hysteresis_vh)?;
        if self.scroll.hysteresis_vh >= self.scroll.section_distance_vh {
            return Err(StageError::config(
                "scroll.hysteresis_vh must be smaller than one section distance",
            ));
        }
        positive("scroll.wide_from_px", self.scroll.wide_from_px)?;

        non_negative("text.reveal_secs", self.text.reveal_secs)?;
        non_negative("text.reveal_stagger_secs", self.text.reveal_stagger_secs)?;
        non_negative("text.hide_stagger_total_secs", self.text.hide_stagger_total_secs)?;
        non_negative("text.label_secs", self.text.label_secs)?;
        positive("text.reroll_secs", self.text.reroll_secs)?;
        if let Some(cs) = &self.text.charset {
            Charset::new(cs).map_err(|e| StageError::config(e.to_string()))?;
        }

        non_negative("transition.duration_secs", self.transition.duration_secs)?;
        if !(0.0..=1.0).contains(&self.transition.fallback_gray) {
            return Err(StageError::config(
                "transition.fallback_gray must be within [0, 1]",
            ));
        }
        if !(1..=MAX_SAMPLE_GRID).contains(&self.transition.sample_grid) {
            return Err(StageError::config(format!(
                "transition.sample_grid must be within 1..={MAX_SAMPLE_GRID}, got {}",
                self.transition.sample_grid
            )));
        }
        if self.transition.max_slots == 0 || self.transition.max_slots > MAX_MEDIA_SLOTS {
            return Err(StageError::config(format!(
                "transition.max_slots must be within 1..={MAX_MEDIA_SLOTS}, got {}",
                self.transition.max_slots
            )));
        }

        positive("input.wheel_line_px", self.input.wheel_line_px)?;
        positive("input.arrow_step_px", self.input.arrow_step_px)?;
        positive("input.page_fraction", self.input.page_fraction)?;
        non_negative("input.page_floor_px", self.input.page_floor_px)?;

        non_negative("smooth_scroll.duration_secs", self.smooth_scroll.duration_secs)?;
        non_negative("smooth_scroll.jump_secs", self.smooth_scroll.jump_secs)?;

        if self.sections.is_empty() {
            return Err(StageError::config("at least one section is required"));
        }
        for (i, s) in self.sections.iter().enumerate() {
            if s.name.trim().is_empty() {
                return Err(StageError::config(format!("sections[{i}].name is empty")));
            }
        }
        Ok(())
    }
}
