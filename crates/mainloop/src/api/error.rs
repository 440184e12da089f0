use thiserror::Error;

/// Errors raised when configuring a [`LoopDriver`](crate::LoopDriver).
///
/// Runaway accumulation is not an error: it is reported through the `panic`
/// argument of the end hook instead.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("simulation timestep must be a positive, finite number of milliseconds (got {0})")]
    InvalidTimestep(f64),
    #[error("invalid maximum frame rate {0}")]
    InvalidFrameRate(f64),
    #[error("fps smoothing factor must lie strictly between 0 and 1 (got {0})")]
    InvalidSmoothing(f64),
    #[error("fps update interval must be a positive number of milliseconds (got {0})")]
    InvalidUpdateInterval(f64),
    #[error("initial fps must be a finite, non-negative number (got {0})")]
    InvalidInitialFps(f64),
    #[error("update step budget must allow at least one step per frame")]
    InvalidStepBudget,
    #[error("malformed loop configuration: {0}")]
    Config(#[from] serde_json::Error),
}
