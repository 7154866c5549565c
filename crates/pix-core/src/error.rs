//! # Error Types
//!
//! Promotion is designed never to fail on structurally valid data. A missing
//! type tag and an unregistered type name both have defined fallbacks. The
//! only failure is a behavior rejecting the data it is constructed from,
//! which is reported unmodified to the caller of `objectify`/`iter_children`.

use thiserror::Error;

/// Top-level error type for PIX object construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PixError {
    /// A registered behavior refused to construct an object from the given data.
    #[error("cannot construct {type_name} object: behavior {behavior} rejected data: {reason}")]
    Construction {
        /// Name of the synthesized type being instantiated.
        type_name: String,
        /// Name of the behavior whose construction hook failed.
        behavior: String,
        /// Reason reported by the behavior.
        reason: String,
    },
}

impl PixError {
    /// Convenience constructor used by behavior `init` hooks.
    pub fn construction(
        type_name: impl Into<String>,
        behavior: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Construction {
            type_name: type_name.into(),
            behavior: behavior.into(),
            reason: reason.into(),
        }
    }
}

/// Reason a behavior gives for refusing to wrap a mapping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct Rejection(pub String);

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
