/// Result alias that carries the custom [`BeatscopeError`] type.
pub type Result<T> = std::result::Result<T, BeatscopeError>;

/// Common error type for the core crate.
///
/// The analysis path itself is total: degenerate audio (a silent snapshot, an
/// empty band partition) degrades to neutral output instead of erroring.
/// Errors are reserved for contract violations such as a snapshot that does
/// not match the configured resolution.
#[derive(Debug, thiserror::Error)]
pub enum BeatscopeError {
    /// The caller handed the engine a snapshot of the wrong length.
    #[error("snapshot has {actual} bins but the engine is configured for {expected}")]
    SnapshotLength { expected: usize, actual: usize },
    /// A tunable was rejected during construction or reconfiguration.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Free-form error used by the application layer.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl BeatscopeError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}
