use std::collections::HashMap;

/// Handle of one text-bearing element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub usize);

/// Where a scramble run writes its text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextTarget {
    Element(ElementId),
    /// The compact section label shown on narrow viewports.
    Label,
}

/// The part of the page the scroll engine reads and writes.
pub trait TextDocument {
    /// Text elements of a section container, in document order. `None` when the section is not
    /// on the page.
    fn section_elements(&self, section: &str) -> Option<Vec<ElementId>>;

    fn text(&self, target: TextTarget) -> String;

    fn set_text(&mut self, target: TextTarget, text: &str);

    fn set_section_visible(&mut self, section: &str, visible: bool);
}

#[derive(Clone, Debug)]
struct MemorySection {
    elements: Vec<ElementId>,
    visible: bool,
}

/// In-memory page used by the CLI and by tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryDocument {
    sections: HashMap<String, MemorySection>,
    texts: Vec<String>,
    label: String,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a visible section holding one element per text.
    pub fn with_section(mut self, name: &str, texts: &[&str]) -> Self {
        let elements = texts
            .iter()
            .map(|t| {
                self.texts.push((*t).to_owned());
                ElementId(self.texts.len() - 1)
            })
            .collect();
        self.sections.insert(
            name.to_owned(),
            MemorySection {
                elements,
                visible: true,
            },
        );
        self
    }

    pub fn is_visible(&self, section: &str) -> bool {
        self.sections.get(section).is_some_and(|s| s.visible)
    }

    /// Current texts of a section's elements.
    pub fn section_texts(&self, section: &str) -> Vec<String> {
        self.sections
            .get(section)
            .map(|s| s.elements.iter().map(|e| self.texts[e.0].clone()).collect())
            .unwrap_or_default()
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl TextDocument for MemoryDocument {
    fn section_elements(&self, section: &str) -> Option<Vec<ElementId>> {
        self.sections.get(section).map(|s| s.elements.clone())
    }

    fn text(&self, target: TextTarget) -> String {
        match target {
            TextTarget::Element(id) => self.texts.get(id.0).cloned().unwrap_or_default(),
            TextTarget::Label => self.label.clone(),
        }
    }

    fn set_text(&mut self, target: TextTarget, text: &str) {
        match target {
            TextTarget::Element(id) => {
                if let Some(t) = self.texts.get_mut(id.0) {
                    text.clone_into(t);
                }
            }
            TextTarget::Label => text.clone_into(&mut self.label),
        }
    }

    fn set_section_visible(&mut self, section: &str, visible: bool) {
        if let Some(s) = self.sections.get_mut(section) {
            s.visible = visible;
        }
    }
}
