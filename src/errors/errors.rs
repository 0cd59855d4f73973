use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
}

impl Error {
    pub fn new(error_impl: ErrorImpl) -> Self {
        Error {
            internal_error: error_impl,
        }
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::ModuleNotFound { .. } => "ModuleNotFound",
            ErrorImpl::ModuleLoad { .. } => "ModuleLoad",
            ErrorImpl::Invocation { .. } => "Invocation",
            ErrorImpl::ModulePanicked { .. } => "ModulePanicked",
            ErrorImpl::WorkerUnavailable => "WorkerUnavailable",
            ErrorImpl::WorkerSpawn { .. } => "WorkerSpawn",
            ErrorImpl::RelativeAssetRoot { .. } => "RelativeAssetRoot",
            ErrorImpl::InvalidArgument { .. } => "InvalidArgument",
            ErrorImpl::ReadInput { .. } => "ReadInput",
            ErrorImpl::Serialization { .. } => "Serialization",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::ModuleNotFound { path } => ErrorTip::Suggestion(format!(
                "No compiler at `{}`, set VELVEX_ASSET_ROOT to the directory holding it",
                path
            )),
            ErrorImpl::ModuleLoad { .. } => ErrorTip::None,
            ErrorImpl::Invocation { entry_point, .. } => ErrorTip::Suggestion(format!(
                "Check that the compiler exports `{}`",
                entry_point
            )),
            ErrorImpl::ModulePanicked { .. } => ErrorTip::None,
            ErrorImpl::WorkerUnavailable => ErrorTip::Suggestion(String::from(
                "The compiler worker has stopped, restart the console",
            )),
            ErrorImpl::WorkerSpawn { .. } => ErrorTip::None,
            ErrorImpl::RelativeAssetRoot { path } => ErrorTip::Suggestion(format!(
                "Use an absolute path instead of `{}`",
                path
            )),
            ErrorImpl::InvalidArgument { argument } => ErrorTip::Suggestion(format!(
                "Unknown argument `{}`, expected [--render] [--events] [--highlight] [FILE]",
                argument
            )),
            ErrorImpl::ReadInput { path, .. } => {
                ErrorTip::Suggestion(format!("Could not read `{}`", path))
            }
            ErrorImpl::Serialization { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

impl From<ErrorImpl> for Error {
    fn from(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    #[error("compiler module not found at {path:?}")]
    ModuleNotFound { path: String },
    #[error("failed to instantiate compiler module: {message}")]
    ModuleLoad { message: String },
    #[error("call to {entry_point:?} failed: {message}")]
    Invocation { entry_point: String, message: String },
    #[error("{message}")]
    ModulePanicked { message: String },
    #[error("compiler worker is no longer running")]
    WorkerUnavailable,
    #[error("failed to spawn compiler worker: {message}")]
    WorkerSpawn { message: String },
    #[error("asset root must be an absolute path, got {path:?}")]
    RelativeAssetRoot { path: String },
    #[error("unrecognised argument: {argument:?}")]
    InvalidArgument { argument: String },
    #[error("failed to read {path:?}: {message}")]
    ReadInput { path: String, message: String },
    #[error("malformed worker message: {message}")]
    Serialization { message: String },
}
