use cinder_deposit::error::CinderDepositError;
use serde_xml_rs::Error;
use std::fmt;

/// Pipeline stage reported when an orchestrated run fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Persist,
    Map,
    Reduce,
    Reference,
    Query,
    Validate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Persist => "persist",
            Stage::Map => "map",
            Stage::Reduce => "reduce",
            Stage::Reference => "reference",
            Stage::Query => "query",
            Stage::Validate => "validate",
        };
        f.write_str(name)
    }
}

#[derive(Debug, PartialEq)]
pub enum CinderRefineryError {
    ConfigError(String),
    MalformedRecord(String),
    InvalidWorkerCount(usize),
    WorkerError(String),
    DepositError(CinderDepositError),
    ValidationMismatch(String),
    StageFailed(Stage, Box<CinderRefineryError>),
}

impl CinderRefineryError {
    pub fn at_stage(self, stage: Stage) -> Self {
        CinderRefineryError::StageFailed(stage, Box::new(self))
    }

    /// The error with any stage wrapping removed.
    pub fn root(&self) -> &CinderRefineryError {
        match self {
            CinderRefineryError::StageFailed(_, inner) => inner.root(),
            other => other,
        }
    }
}

impl fmt::Display for CinderRefineryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CinderRefineryError::ConfigError(msg) => write!(f, "config error: {}", msg),
            CinderRefineryError::MalformedRecord(msg) => write!(f, "malformed record: {}", msg),
            CinderRefineryError::InvalidWorkerCount(count) => {
                write!(f, "worker count must be at least 1, got {}", count)
            }
            CinderRefineryError::WorkerError(msg) => write!(f, "worker failed: {}", msg),
            CinderRefineryError::DepositError(err) => write!(f, "{}", err),
            CinderRefineryError::ValidationMismatch(msg) => {
                write!(f, "results disagree: {}", msg)
            }
            CinderRefineryError::StageFailed(stage, err) => {
                write!(f, "{} stage failed: {}", stage, err)
            }
        }
    }
}

impl std::error::Error for CinderRefineryError {}

impl From<Error> for CinderRefineryError {
    fn from(value: Error) -> Self {
        CinderRefineryError::ConfigError(value.to_string())
    }
}

impl From<CinderDepositError> for CinderRefineryError {
    fn from(value: CinderDepositError) -> Self {
        CinderRefineryError::DepositError(value)
    }
}

impl From<tokio::task::JoinError> for CinderRefineryError {
    fn from(value: tokio::task::JoinError) -> Self {
        CinderRefineryError::WorkerError(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CinderRefineryError>;
