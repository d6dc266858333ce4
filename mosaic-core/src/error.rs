//! Error types shared by bit vectors, boards and matches.

use crate::moves::Move;

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ErrorKind {
    /// Index, board size or shift amount out of bounds.
    Range,
    /// Malformed textual bit pattern.
    Format,
    /// Target cell is not in the legal set.
    IllegalMove,
    /// A move was attempted after the match ended.
    GameAlreadyOver,
    /// Undo requested with no move left to take back.
    NoUndoAvailable,
    /// Redo requested with nothing undone.
    NoRedoAvailable,
    /// Configuration could not be parsed.
    Config,
}

/// Errors returned by the engine. None of them is fatal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("index {index} out of range for capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },

    #[error("board size {size} out of range (1..={max})")]
    SizeOutOfRange { size: usize, max: usize },

    #[error("illegal shift amount: {0}")]
    NegativeShift(isize),

    #[error("invalid digit {found:?} at position {position}")]
    InvalidDigit { found: char, position: usize },

    #[error("illegal move: {}", .0.offset())]
    IllegalMove(Move),

    #[error("the game is already over")]
    GameAlreadyOver,

    #[error("no more undoable moves")]
    NoUndoAvailable,

    #[error("no more redoable moves")]
    NoRedoAvailable,

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IndexOutOfRange { .. } | Error::SizeOutOfRange { .. } | Error::NegativeShift(_) => {
                ErrorKind::Range
            }
            Error::InvalidDigit { .. } => ErrorKind::Format,
            Error::IllegalMove(_) => ErrorKind::IllegalMove,
            Error::GameAlreadyOver => ErrorKind::GameAlreadyOver,
            Error::NoUndoAvailable => ErrorKind::NoUndoAvailable,
            Error::NoRedoAvailable => ErrorKind::NoRedoAvailable,
            Error::Config(_) => ErrorKind::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_display() {
        let err = Error::IndexOutOfRange { index: 8, capacity: 8 };
        assert_eq!(err.to_string(), "index 8 out of range for capacity 8");
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_size_error_display() {
        let err = Error::SizeOutOfRange { size: 0, max: 16 };
        assert_eq!(err.to_string(), "board size 0 out of range (1..=16)");
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_negative_shift_is_range() {
        assert_eq!(Error::NegativeShift(-1).kind(), ErrorKind::Range);
        assert_eq!(Error::NegativeShift(-1).to_string(), "illegal shift amount: -1");
    }

    #[test]
    fn test_format_error_display() {
        let err = Error::InvalidDigit { found: '2', position: 3 };
        assert_eq!(err.to_string(), "invalid digit '2' at position 3");
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_match_errors_display() {
        assert_eq!(Error::IllegalMove(Move(9)).to_string(), "illegal move: 9");
        assert_eq!(Error::GameAlreadyOver.to_string(), "the game is already over");
        assert_eq!(Error::NoUndoAvailable.kind(), ErrorKind::NoUndoAvailable);
        assert_eq!(Error::NoRedoAvailable.kind(), ErrorKind::NoRedoAvailable);
    }
}
