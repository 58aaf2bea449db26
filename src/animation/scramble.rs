use crate::foundation::{
    error::{StageError, StageResult},
    math::{Rng64, mix_seed},
};

/// Glyph sets a page picks from at startup when none is configured.
pub const BUILTIN_CHARSETS: [&str; 6] = [
    "■.▪▌▐▬",
    "_ - .",
    "//_",
    "0123456789 -_",
    "▲△▼▽◇■□◯●★☆✦✧◆◇",
    "🔴🟡🟢🔵🟣🟤🟧🟨🟠🟦🟪🟥",
];

/// Non-empty set of glyphs used for unrevealed positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Charset {
    glyphs: Vec<char>,
}

impl Charset {
    pub fn new(glyphs: &str) -> StageResult<Self> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.is_empty() {
            return Err(StageError::validation("scramble charset must not be empty"));
        }
        Ok(Self { glyphs })
    }

    /// Pick one of [`BUILTIN_CHARSETS`] from a seed.
    pub fn pick_builtin(seed: u64) -> Self {
        let idx = Rng64::new(seed).next_index(BUILTIN_CHARSETS.len());
        Self {
            glyphs: BUILTIN_CHARSETS[idx].chars().collect(),
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.glyphs.contains(&c)
    }

    fn glyph(&self, seed: u64) -> char {
        self.glyphs[Rng64::new(seed).next_index(self.glyphs.len())]
    }
}

/// Per-character scramble from a captured start text to a target text.
///
/// The visible length tweens between the two lengths, the target is revealed left to right as
/// progress grows and every other position shows a glyph that is re-rolled every
/// `reroll_secs`. Rendering is a pure function of `(progress, elapsed)`.
#[derive(Clone, Debug)]
pub struct ScrambleText {
    from_len: usize,
    to: Vec<char>,
    seed: u64,
    reroll_secs: f64,
}

impl ScrambleText {
    pub fn new(from: &str, to: &str, seed: u64, reroll_secs: f64) -> Self {
        Self {
            from_len: from.chars().count(),
            to: to.chars().collect(),
            seed,
            reroll_secs: reroll_secs.max(1e-3),
        }
    }

    pub fn target(&self) -> String {
        self.to.iter().collect()
    }

    pub fn render(&self, progress: f64, elapsed: f64, charset: &Charset) -> String {
        let p = progress.clamp(0.0, 1.0);
        if p >= 1.0 {
            return self.target();
        }
        let to_len = self.to.len();
        let len = (self.from_len as f64 + (to_len as f64 - self.from_len as f64) * p).round();
        let len = len.max(0.0) as usize;
        let revealed = ((to_len as f64 * p).floor() as usize).min(len);

        let bucket = (elapsed.max(0.0) / self.reroll_secs).floor() as u64;
        let bucket_seed = mix_seed(self.seed, bucket);

        let mut out = String::with_capacity(len * 4);
        out.extend(self.to[..revealed].iter());
        for j in revealed..len {
            out.push(charset.glyph(mix_seed(bucket_seed, j as u64 + 1)));
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scramble.rs"]
mod tests;
