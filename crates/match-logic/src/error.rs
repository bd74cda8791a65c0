//! Error types for arena configuration

use thiserror::Error;

use crate::strategy::Strategy;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArenaError {
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Invalid payoffs: {0}")]
    InvalidPayoffs(String),

    #[error("Invalid strategy parameters: {0}")]
    InvalidParams(String),

    #[error("Tournament needs at least {need} strategies, got {got}")]
    EmptyCatalog { need: usize, got: usize },

    #[error("Strategy listed twice: {0}")]
    DuplicateStrategy(Strategy),
}

pub type ArenaResult<T> = Result<T, ArenaError>;
