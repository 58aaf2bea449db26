use crate::{
    animation::scramble::{Charset, ScrambleText},
    config::TextConfig,
    foundation::math::mix_seed,
    scroll::document::{ElementId, TextDocument, TextTarget},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunKind {
    Reveal,
    Hide,
}

#[derive(Clone, Debug)]
struct RunItem {
    target: TextTarget,
    scramble: ScrambleText,
    delay: f64,
}

/// A staggered group of scrambles started together.
///
/// Start texts are captured when the run is created, so a run that replaces a half-finished
/// one starts from whatever is on screen.
#[derive(Clone, Debug)]
pub struct TextRun {
    kind: RunKind,
    items: Vec<RunItem>,
    duration: f64,
    elapsed: f64,
}

impl TextRun {
    /// Type `targets` into place, element `i` starting `i · stagger` seconds late.
    pub fn reveal(
        doc: &dyn TextDocument,
        targets: &[(TextTarget, String)],
        duration: f64,
        stagger: f64,
        cfg: &TextConfig,
        seed: u64,
    ) -> Self {
        let delays = (0..targets.len()).map(|i| i as f64 * stagger);
        Self::build(RunKind::Reveal, doc, targets, delays, duration, cfg, seed)
    }

    /// Scramble every target to empty, last element first, spreading `total_stagger` seconds
    /// across all of them.
    pub fn hide(
        doc: &dyn TextDocument,
        targets: &[TextTarget],
        duration: f64,
        total_stagger: f64,
        cfg: &TextConfig,
        seed: u64,
    ) -> Self {
        let n = targets.len();
        let step = if n > 1 {
            total_stagger / (n - 1) as f64
        } else {
            0.0
        };
        let delays = (0..n).map(move |i| (n - 1 - i) as f64 * step);
        let targets: Vec<(TextTarget, String)> =
            targets.iter().map(|&t| (t, String::new())).collect();
        Self::build(RunKind::Hide, doc, &targets, delays, duration, cfg, seed)
    }

    fn build(
        kind: RunKind,
        doc: &dyn TextDocument,
        targets: &[(TextTarget, String)],
        delays: impl Iterator<Item = f64>,
        duration: f64,
        cfg: &TextConfig,
        seed: u64,
    ) -> Self {
        let items = targets
            .iter()
            .zip(delays)
            .enumerate()
            .map(|(i, ((target, text), delay))| RunItem {
                target: *target,
                scramble: ScrambleText::new(
                    &doc.text(*target),
                    text,
                    mix_seed(seed, i as u64),
                    cfg.reroll_secs,
                ),
                delay,
            })
            .collect();
        Self {
            kind,
            items,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    pub fn kind(&self) -> RunKind {
        self.kind
    }

    /// Time until the last element settles.
    pub fn total_secs(&self) -> f64 {
        self.items
            .iter()
            .map(|it| it.delay + self.duration)
            .fold(0.0, f64::max)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.total_secs()
    }

    /// Advance and write every started element. Returns `true` once the whole run has settled.
    pub fn advance(&mut self, dt: f64, doc: &mut dyn TextDocument, charset: &Charset) -> bool {
        self.elapsed += dt.max(0.0);
        for it in &self.items {
            let local = self.elapsed - it.delay;
            if local < 0.0 {
                continue;
            }
            let progress = if self.duration <= 0.0 {
                1.0
            } else {
                local / self.duration
            };
            doc.set_text(it.target, &it.scramble.render(progress, local, charset));
        }
        self.is_finished()
    }
}

/// Reveal/hide state of one registered section.
///
/// Reveal and hide share a single run slot: restarting either one discards the other.
#[derive(Clone, Debug)]
pub struct SectionText {
    name: String,
    elements: Vec<ElementId>,
    originals: Vec<String>,
    run: Option<TextRun>,
}

impl SectionText {
    /// Capture a section's original texts. `None` when the section is not in the document.
    pub fn register(doc: &dyn TextDocument, name: &str) -> Option<Self> {
        let elements = doc.section_elements(name)?;
        if elements.is_empty() {
            return None;
        }
        let originals = elements
            .iter()
            .map(|&e| doc.text(TextTarget::Element(e)))
            .collect();
        Some(Self {
            name: name.to_owned(),
            elements,
            originals,
            run: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn originals(&self) -> &[String] {
        &self.originals
    }

    pub fn running(&self) -> Option<RunKind> {
        self.run.as_ref().map(TextRun::kind)
    }

    /// Blank every element and hide the container without animating.
    pub fn clear(&mut self, doc: &mut dyn TextDocument) {
        self.run = None;
        for &e in &self.elements {
            doc.set_text(TextTarget::Element(e), "");
        }
        doc.set_section_visible(&self.name, false);
    }

    pub fn restart_reveal(&mut self, doc: &mut dyn TextDocument, cfg: &TextConfig, seed: u64) {
        let targets: Vec<(TextTarget, String)> = self
            .elements
            .iter()
            .zip(&self.originals)
            .map(|(&e, t)| (TextTarget::Element(e), t.clone()))
            .collect();
        self.run = Some(TextRun::reveal(
            doc,
            &targets,
            cfg.reveal_secs,
            cfg.reveal_stagger_secs,
            cfg,
            seed,
        ));
        doc.set_section_visible(&self.name, true);
    }

    pub fn restart_hide(&mut self, doc: &mut dyn TextDocument, cfg: &TextConfig, seed: u64) {
        let targets: Vec<TextTarget> = self
            .elements
            .iter()
            .map(|&e| TextTarget::Element(e))
            .collect();
        self.run = Some(TextRun::hide(
            doc,
            &targets,
            cfg.reveal_secs,
            cfg.hide_stagger_total_secs,
            cfg,
            seed,
        ));
    }

    pub fn tick(&mut self, dt: f64, doc: &mut dyn TextDocument, charset: &Charset) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        if run.advance(dt, doc, charset) {
            if run.kind() == RunKind::Hide {
                doc.set_section_visible(&self.name, false);
            }
            self.run = None;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/reveal.rs"]
mod tests;
