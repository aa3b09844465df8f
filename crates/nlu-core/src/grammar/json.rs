//! JSON encoding of the grammar artifact -- human-authored/debuggable.

use crate::error::GrammarLoadError;

use super::artifact::GrammarArtifact;

impl GrammarArtifact {
    pub fn from_json(json: &str) -> Result<Self, GrammarLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("grammar artifact is always representable as JSON")
    }
}
