//! Compact binary encoding of the grammar artifact via `postcard`, the
//! form a grammar-authoring pipeline ships to production.

use crate::error::GrammarLoadError;

use super::artifact::GrammarArtifact;

impl GrammarArtifact {
    pub fn from_binary(bytes: &[u8]) -> Result<Self, GrammarLoadError> {
        Ok(postcard::from_bytes(bytes)?)
    }

    pub fn to_binary(&self) -> Vec<u8> {
        postcard::to_allocvec(self).expect("grammar artifact is always representable as postcard")
    }
}
