//! Fatal, build-time errors for state-table construction.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("start symbol `{0}` has no productions to derive from")]
    EmptyStartSymbol(String),
}
