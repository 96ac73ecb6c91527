use thiserror::Error;

/// Failures while building or parsing a touch event record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TouchError {
    #[error("pointer index {index} out of range for {count} pointers")]
    PointerIndexOutOfRange { index: usize, count: usize },

    #[error("too many pointers: {0}")]
    TooManyPointers(usize),

    #[error("touch record truncated: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("negative pointer count {0}")]
    NegativeCount(i32),

    #[error("{0} trailing bytes after touch record")]
    TrailingBytes(usize),
}

/// Render thread failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("render thread panicked: {0}")]
    Panicked(String),
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum GlueError {
    #[error(transparent)]
    Touch(#[from] TouchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[cfg(target_os = "android")]
    #[error("jni call failed: {0}")]
    Jni(#[from] jni::errors::Error),

    #[error("no engine factory installed")]
    NoEngineFactory,
}

pub type Result<T, E = GlueError> = std::result::Result<T, E>;
