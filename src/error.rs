use thiserror::Error;

use crate::types::AnalysisStatus;

/// Machine-readable category of an [`AnalysisError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InsufficientData,
    InvalidData,
    Computation,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Indicator computation error: {0}")]
    Computation(String),
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientData(_) => ErrorKind::InsufficientData,
            Self::InvalidData(_) => ErrorKind::InvalidData,
            Self::Computation(_) => ErrorKind::Computation,
        }
    }

    /// Report status a failed analysis is downgraded to.
    pub fn status(&self) -> AnalysisStatus {
        match self.kind() {
            ErrorKind::InsufficientData => AnalysisStatus::NoData,
            ErrorKind::InvalidData => AnalysisStatus::InvalidData,
            ErrorKind::Computation => AnalysisStatus::AnalysisError,
        }
    }
}
