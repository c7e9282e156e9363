//! Error types for canonicalization, remote fetches, and report rendering.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal schema violation found during canonicalization.
///
/// Any of these aborts the whole run before drift auditing starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A boolean variant-axis param has no option-label mapping.
    #[error(
        "{component}.{param}: BOOLEAN param bound to VARIANT_AXIS requires a non-empty variantAxis.valueMap"
    )]
    MissingValueMap {
        /// Component name.
        component: String,
        /// Param name.
        param: String,
    },

    /// A required prop-only param has no baked-in default.
    #[error("{component}.{param}: required PROP_ONLY param requires a non-null default")]
    MissingPropOnlyDefault {
        /// Component name.
        component: String,
        /// Param name.
        param: String,
    },

    /// A required callback param has no usable arity.
    #[error(
        "{component}.{param}: required EXCLUDED param with NONE binding requires callbackArity >= 0"
    )]
    MissingCallbackArity {
        /// Component name.
        component: String,
        /// Param name.
        param: String,
    },
}

/// Failure of the remote fetch capability.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    /// The registry answered with a non-success status.
    #[error("registry returned http={status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, as received.
        body: String,
    },

    /// The registry answered but the payload could not be interpreted.
    #[error("failed to parse registry payload: {message}")]
    Parse {
        /// What went wrong.
        message: String,
    },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("registry request failed: {message}")]
    Transport {
        /// What went wrong.
        message: String,
    },
}

impl FetchError {
    /// Builds a [`FetchError::Parse`].
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse { message: message.into() }
    }

    /// Builds a [`FetchError::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }
}

/// Failure while serializing a drift report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// JSON serialization failed.
    #[error("failed to serialize drift report: {0}")]
    Json(#[from] serde_json::Error),
}
