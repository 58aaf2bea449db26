//! Read-only portfolio content handed over by the page's content source.

use serde::{Deserialize, Serialize};

use crate::foundation::error::{StageError, StageResult};

/// Image shown for an entry in listings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// One portfolio entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    /// Stable identifier; also the overlay panel slug.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub image: Option<ImageDescriptor>,
    /// Hover media sources. Opaque strings.
    #[serde(default)]
    pub media: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentManifest {
    pub entries: Vec<PortfolioEntry>,
}

impl ContentManifest {
    pub fn from_json_str(s: &str) -> StageResult<Self> {
        let manifest: Self =
            serde_json::from_str(s).map_err(|e| StageError::validation(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> StageResult<()> {
        let mut seen = std::collections::HashSet::new();
        for e in &self.entries {
            if e.id.trim().is_empty() {
                return Err(StageError::validation("content entry id must be non-empty"));
            }
            if !seen.insert(e.id.as_str()) {
                return Err(StageError::validation(format!(
                    "duplicate content entry id '{}'",
                    e.id
                )));
            }
        }
        Ok(())
    }

    /// Panel slugs in listing order.
    pub fn slugs(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    /// Hover media slot sources: the first media source of each entry, in listing order,
    /// capped at `max_slots`. Entries without media keep their slot with no source.
    pub fn media_slots(&self, max_slots: usize) -> Vec<Option<String>> {
        self.entries
            .iter()
            .take(max_slots)
            .map(|e| e.media.first().cloned())
            .collect()
    }
}
