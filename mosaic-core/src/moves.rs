//! Moves as board offsets.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{Error, Result};

/// A placement at one board offset.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Move(pub u16);

impl Move {
    #[inline]
    pub fn offset(self) -> usize {
        self.0 as usize
    }

    /// One-bit board of the given size.
    pub fn to_board(self, size: usize) -> Result<Board> {
        Board::single(size, self.offset())
    }

    /// Every occupied offset of `board` as a move, ascending.
    pub fn from_board(board: &Board) -> Vec<Move> {
        board.offsets().map(|offset| Move(offset as u16)).collect()
    }
}

impl From<u16> for Move {
    fn from(offset: u16) -> Move {
        Move(offset)
    }
}
