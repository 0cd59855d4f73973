use serde::{Deserialize, Serialize};

use crate::errors::errors::{Error, ErrorImpl};

/// One compile request, carrying already sanitized source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileRequest {
    pub code: String,
}

impl CompileRequest {
    pub fn new(code: impl Into<String>) -> Self {
        CompileRequest { code: code.into() }
    }
}

/// Event sent from the worker to the foreground.
///
/// Serialized as `{"type": "stdout", "text": ...}`, `{"type": "stderr", ...}`
/// or `{"type": "done"}`. Order is the channel's order, there is no
/// sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerMessage {
    Stdout { text: String },
    Stderr { text: String },
    Done,
}

impl WorkerMessage {
    pub fn stdout(text: impl Into<String>) -> Self {
        WorkerMessage::Stdout { text: text.into() }
    }

    pub fn stderr(text: impl Into<String>) -> Self {
        WorkerMessage::Stderr { text: text.into() }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, WorkerMessage::Done)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|err| {
            Error::new(ErrorImpl::Serialization {
                message: err.to_string(),
            })
        })
    }

    pub fn from_json(json: &str) -> Result<WorkerMessage, Error> {
        serde_json::from_str(json).map_err(|err| {
            Error::new(ErrorImpl::Serialization {
                message: err.to_string(),
            })
        })
    }
}
