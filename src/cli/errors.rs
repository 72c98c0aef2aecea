use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("Nothing to do: --no-display without -s/--save")]
    NothingToDo,

    #[error("No viewer available: built without the `gui` feature; use -s/--save")]
    ViewerUnavailable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Parse(#[from] mscomposite::ParseError),
}
