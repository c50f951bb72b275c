use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `phodo`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum PhodoError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Evaluation pipeline ─────────────────────────────────────────────
    #[error("evaluation: {0}")]
    Eval(#[from] EvalError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Evaluation errors ──────────────────────────────────────────────────────

/// Failure taxonomy of the evaluation pipeline.
///
/// `MissingInput` is a caller error and is rejected before any external call.
/// The other variants abort the pipeline and surface to the caller as a
/// generic failure carrying the internal detail string; none of them is
/// retried here. A tier label missing from the hit store is deliberately NOT
/// part of this taxonomy: counter maintenance is best-effort and only logged.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("image payload is required")]
    MissingInput,

    #[error("model invocation failed: {0}")]
    Upstream(String),

    #[error("model output is not parseable JSON: {0}")]
    Parse(String),

    #[error("model output failed schema validation: {0}")]
    Schema(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, PhodoError>;
