//! Errors raised at construction/setup time. The render loop itself never returns an error —
//! see the module docs on [`crate::renderer`].

use thiserror::Error;

/// The engine's complete error taxonomy. Numerical edge cases encountered during rendering
/// (degenerate determinants, total internal reflection, grazing rays) are never represented
/// here — they are handled as a miss or an absorption and folded into normal output.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A construction-time precondition was violated (zero-scale transform, empty mesh,
    /// zero-dimensioned image, a material/texture pairing that can't be satisfied).
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A lifecycle method was called in a state that doesn't permit it (`start_render` while
    /// workers are still running, `set_scene` mid-render).
    #[error("invalid state: {message}")]
    InvalidState { message: String },
}

impl EngineError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
