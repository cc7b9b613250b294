//! Non-fatal anomalies raised while resolving columns

use std::fmt;

/// A warning recorded during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An output column was overwritten
    Clobber(String),
    /// An output column was removed by a formula
    Removed(String),
    /// A column or alias named `__aliases` suppressed the nested alias object
    AliasesShadowed,
}

impl Diagnostic {
    /// Log the diagnostic and hand it back for recording
    pub(crate) fn emit(self) -> Self {
        tracing::warn!("{}", self);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Clobber(name) => write!(f, "clobbering column '{}'.", name),
            Diagnostic::Removed(name) => write!(f, "removing column '{}'.", name),
            Diagnostic::AliasesShadowed => write!(
                f,
                "detected column named '{}'. Will not populate special object of same name.",
                crate::namespace::ALIASES_KEY
            ),
        }
    }
}
