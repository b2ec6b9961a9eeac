use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell index outside of the board")]
    InvalidIndex,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
}

pub type Result<T> = core::result::Result<T, GameError>;
