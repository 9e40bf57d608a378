use std::path::{Path, PathBuf};

use rand::{Rng, seq::SliceRandom};
use serde::Deserialize;

use crate::utils::{bold, render_template};

/// One line of the roast database. Explained entries are stored as a two element array
/// `["roast", "explanation"]`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RoastEntry {
    Line(String),
    Explained(String, String),
}

/// A roast ready to be sent, with the explanation to give if someone asks for it
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRoast {
    pub text: String,
    pub explanation: Option<String>,
}

impl RoastEntry {
    /// Fill `{mention}` and `{author}` in explained entries. Plain lines are sent as written.
    pub fn render(&self, target_name: &str, author_name: &str) -> RenderedRoast {
        match self {
            RoastEntry::Line(text) => RenderedRoast {
                text: text.clone(),
                explanation: None,
            },
            RoastEntry::Explained(text, explanation) => {
                let target = bold(target_name);
                let author = bold(author_name);
                let data = [("{mention}", target.as_str()), ("{author}", author.as_str())];
                RenderedRoast {
                    text: render_template(text, &data),
                    explanation: Some(render_template(explanation, &data)),
                }
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RoastStoreError {
    #[error("Could not read roast database `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Roast database is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Roast database is empty")]
    Empty,
}

/// Read-only set of roast lines loaded once at startup
#[derive(Debug)]
pub struct RoastStore {
    entries: Vec<RoastEntry>,
}

impl RoastStore {
    pub fn load(path: &Path) -> Result<Self, RoastStoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RoastStoreError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, RoastStoreError> {
        let entries: Vec<RoastEntry> = serde_json::from_str(raw)?;
        if entries.is_empty() {
            return Err(RoastStoreError::Empty);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn from_entries(entries: Vec<RoastEntry>) -> Self {
        Self { entries }
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[RoastEntry] {
        &self.entries
    }

    /// Uniformly random entry
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&RoastEntry> {
        self.entries.choose(rng)
    }
}
