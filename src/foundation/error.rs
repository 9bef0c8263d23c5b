/// Convenience result type used across algonim.
pub type AlgonimResult<T> = Result<T, AlgonimError>;

/// Top-level error taxonomy used by the rendering core and its hosts.
#[derive(thiserror::Error, Debug)]
pub enum AlgonimError {
    /// Malformed layout description (unsupported axis, bad ratio, wrong shape).
    #[error("layout error: {0}")]
    Layout(String),

    /// Layout recursion went deeper than the configured limit.
    #[error("layout error: depth limit of {limit} reached while scanning layout")]
    DepthLimit {
        /// The limit that was exceeded.
        limit: usize,
    },

    /// The drawing surface could not hand out a compatible drawing context.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Use of a handle whose target was deleted (tree node, sign, graph node or edge).
    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    /// `create_model` was asked for a kind the registry does not know.
    #[error("unknown model kind '{0}'")]
    UnknownModel(String),

    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AlgonimError {
    /// Build a [`AlgonimError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`AlgonimError::SurfaceUnavailable`] value.
    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build a [`AlgonimError::InvalidHandle`] value.
    pub fn invalid_handle(msg: impl Into<String>) -> Self {
        Self::InvalidHandle(msg.into())
    }

    /// Build a [`AlgonimError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`AlgonimError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
