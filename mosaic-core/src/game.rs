//! Match engine: turn order, legality, chain placement and ply history.
//!
//! Each participant owns one [`Board`]. A move sets one cell on the mover's
//! board; afterwards every participant that controls enough of a scaffolded,
//! vacant cell's footprint receives that cell automatically, repeated until
//! nothing changes or the match ends.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Promotion};
use crate::error::{Error, Result};
use crate::moves::Move;

/// Rule set of a match.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Two players; chains need a footprint majority.
    #[default]
    HeadToHead,
    /// Four players in teams of seats 0+2 and 1+3; chains need half a footprint.
    Teams,
}

impl Variant {
    /// Number of seats.
    #[inline]
    pub fn participants(self) -> usize {
        match self {
            Variant::HeadToHead => 2,
            Variant::Teams => 4,
        }
    }

    /// Footprint rule for automatic placement.
    #[inline]
    pub fn chain_rule(self) -> Promotion {
        match self {
            Variant::HeadToHead => Promotion::Majority,
            Variant::Teams => Promotion::HalfOrMore,
        }
    }

    /// Seats belonging to `side`.
    pub fn seats(self, side: Side) -> &'static [usize] {
        match (self, side) {
            (Variant::HeadToHead, Side::First) => &[0],
            (Variant::HeadToHead, Side::Second) => &[1],
            (Variant::Teams, Side::First) => &[0, 2],
            (Variant::Teams, Side::Second) => &[1, 3],
        }
    }
}

/// One of the two competing sides. In [`Variant::Teams`] a side is a team.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
}

impl Side {
    /// Side that plays from `seat`.
    #[inline]
    pub fn of_seat(seat: usize) -> Side {
        if seat % 2 == 0 {
            Side::First
        } else {
            Side::Second
        }
    }

    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// Board snapshot after a ply.
#[derive(Clone, Debug)]
struct Ply {
    boards: Vec<Board>,
    to_move: usize,
}

/// Serializable move list that rebuilds a match.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MatchRecord {
    pub variant: Variant,
    pub size: usize,
    pub moves: Vec<Move>,
}

/// A match in progress or finished.
///
/// History invariant: `plies.len() == moves.len() + 1` and the current state
/// is `plies[moves.len() - undo_count]`.
#[derive(Clone, Debug)]
pub struct Match {
    variant: Variant,
    size: usize,
    pieces_per_player: usize,
    neutral: Board,
    ground: Board,
    plies: Vec<Ply>,
    moves: Vec<Move>,
    undo_count: usize,
}

impl Match {
    /// Fresh match with no moves made.
    pub fn new(variant: Variant, size: usize) -> Result<Match> {
        let empty = Board::empty(size)?;
        let neutral = Board::neutral(size)?;
        let ground = Board::ground(size)?;
        let participants = variant.participants();
        let pieces_per_player = Board::filled(size)?.count() / participants;

        debug!(
            "new {:?} match: size {}, {} pieces per player",
            variant, size, pieces_per_player
        );

        Ok(Match {
            variant,
            size,
            pieces_per_player,
            neutral,
            ground,
            plies: vec![Ply {
                boards: vec![empty; participants],
                to_move: 0,
            }],
            moves: Vec::new(),
            undo_count: 0,
        })
    }

    pub fn head_to_head(size: usize) -> Result<Match> {
        Match::new(Variant::HeadToHead, size)
    }

    pub fn teams(size: usize) -> Result<Match> {
        Match::new(Variant::Teams, size)
    }

    /// Rebuild a match by applying every recorded move.
    ///
    /// Fails with the error of the first move that cannot be applied.
    pub fn replay(record: &MatchRecord) -> Result<Match> {
        let mut game = Match::new(record.variant, record.size)?;
        for &mv in &record.moves {
            game.apply_move(mv)?;
        }
        Ok(game)
    }

    /// Moves up to the current ply.
    pub fn record(&self) -> MatchRecord {
        MatchRecord {
            variant: self.variant,
            size: self.size,
            moves: self.moves().to_vec(),
        }
    }

    // ========== Accessors ==========

    #[inline]
    fn current(&self) -> &Ply {
        &self.plies[self.moves.len() - self.undo_count]
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Quota each participant must fill.
    #[inline]
    pub fn pieces_per_player(&self) -> usize {
        self.pieces_per_player
    }

    /// Participant boards in seat order.
    pub fn boards(&self) -> &[Board] {
        &self.current().boards
    }

    pub fn board(&self, seat: usize) -> Option<&Board> {
        self.current().boards.get(seat)
    }

    pub fn neutral_board(&self) -> &Board {
        &self.neutral
    }

    pub fn placed_pieces(&self, seat: usize) -> usize {
        self.board(seat).map_or(0, Board::count)
    }

    pub fn remaining_pieces(&self, seat: usize) -> usize {
        self.board(seat)
            .map_or(0, |b| self.pieces_per_player.saturating_sub(b.count()))
    }

    /// Seat to move next.
    pub fn current_participant(&self) -> usize {
        self.current().to_move
    }

    /// Applied moves up to the current ply.
    pub fn moves(&self) -> &[Move] {
        &self.moves[..self.moves.len() - self.undo_count]
    }

    pub fn moves_made(&self) -> usize {
        self.moves.len() - self.undo_count
    }

    // ========== Derived boards ==========

    fn occupied_of(&self, boards: &[Board]) -> Board {
        boards
            .iter()
            .fold(self.neutral.clone(), |acc, board| acc.or(board))
    }

    /// Vacant cells that are on the ground or fully supported.
    fn legal_of(&self, boards: &[Board]) -> Board {
        let occupied = self.occupied_of(boards);
        let scaffolded = self.ground.or(&occupied.promote(Promotion::Four));
        occupied.flip().and(&scaffolded)
    }

    fn over_of(&self, boards: &[Board]) -> bool {
        [Side::First, Side::Second]
            .iter()
            .any(|&side| self.side_complete(boards, side))
    }

    fn side_complete(&self, boards: &[Board], side: Side) -> bool {
        self.variant
            .seats(side)
            .iter()
            .all(|&seat| boards[seat].count() >= self.pieces_per_player)
    }

    /// Every cell a move may currently target.
    pub fn legal_board(&self) -> Board {
        self.legal_of(self.boards())
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        Move::from_board(&self.legal_board())
    }

    /// Offsets outside the board are never legal.
    pub fn is_legal_move(&self, mv: Move) -> bool {
        mv.to_board(self.size)
            .map_or(false, |cell| !self.legal_board().and(&cell).is_empty())
    }

    // ========== Outcome ==========

    pub fn is_over(&self) -> bool {
        self.over_of(self.boards())
    }

    /// Whether every seat of `side` has filled its quota.
    pub fn wins(&self, side: Side) -> bool {
        self.side_complete(self.boards(), side)
    }

    /// Winning side once the match is over. `First` is reported when both
    /// sides complete on the same move.
    pub fn winner(&self) -> Option<Side> {
        if self.wins(Side::First) {
            Some(Side::First)
        } else if self.wins(Side::Second) {
            Some(Side::Second)
        } else {
            None
        }
    }

    // ========== Apply & Undo ==========

    /// Place one piece for the current participant, then settle chains.
    pub fn apply_move(&mut self, mv: Move) -> Result<()> {
        if self.is_over() {
            return Err(Error::GameAlreadyOver);
        }
        if !self.is_legal_move(mv) {
            return Err(Error::IllegalMove(mv));
        }

        let mover = self.current_participant();
        let mut boards = self.boards().to_vec();
        boards[mover] = boards[mover].or(&mv.to_board(self.size)?);

        let placed_before: usize = boards.iter().map(Board::count).sum();
        let boards = self.settle(boards);
        let chained = boards.iter().map(Board::count).sum::<usize>() - placed_before;
        let to_move = self.next_participant(mover, &boards);

        let ply = self.moves_made();
        self.moves.truncate(ply);
        self.plies.truncate(ply + 1);
        self.undo_count = 0;
        self.moves.push(mv);
        self.plies.push(Ply { boards, to_move });

        debug!(
            "ply {}: seat {} played {}, {} chained, seat {} to move",
            self.moves.len(),
            mover,
            mv.offset(),
            chained,
            to_move
        );
        Ok(())
    }

    /// Run chain passes until a pass changes nothing or the match ends.
    fn settle(&self, mut boards: Vec<Board>) -> Vec<Board> {
        let rule = self.variant.chain_rule();

        while !self.over_of(&boards) {
            let mut next = boards.clone();
            let mut changed = false;

            for seat in 0..next.len() {
                let vacancy = self.pieces_per_player.saturating_sub(next[seat].count());
                if vacancy == 0 {
                    continue;
                }
                let mut chain = self.legal_of(&next).and(&next[seat].promote(rule));
                if chain.is_empty() {
                    continue;
                }
                if chain.count() > vacancy {
                    chain = chain.lowest(vacancy);
                }
                trace!(
                    "seat {} chains {:?}",
                    seat,
                    chain.offsets().collect::<Vec<_>>()
                );
                next[seat] = next[seat].or(&chain);
                changed = true;
            }

            boards = next;
            if !changed {
                break;
            }
        }

        boards
    }

    fn next_participant(&self, mover: usize, boards: &[Board]) -> usize {
        match self.variant {
            Variant::HeadToHead => (mover + 1) % boards.len(),
            Variant::Teams => {
                let mut seat = mover;
                loop {
                    seat = (seat + 1) % boards.len();
                    if seat == mover || boards[seat].count() < self.pieces_per_player {
                        return seat;
                    }
                }
            }
        }
    }

    pub fn is_undoable(&self) -> bool {
        self.undo_count < self.moves.len()
    }

    pub fn is_redoable(&self) -> bool {
        self.undo_count > 0
    }

    /// Step back one ply.
    pub fn undo(&mut self) -> Result<()> {
        if !self.is_undoable() {
            return Err(Error::NoUndoAvailable);
        }
        self.undo_count += 1;
        debug!("undo to ply {}", self.moves_made());
        Ok(())
    }

    /// Step forward one previously undone ply.
    pub fn redo(&mut self) -> Result<()> {
        if !self.is_redoable() {
            return Err(Error::NoRedoAvailable);
        }
        self.undo_count -= 1;
        debug!("redo to ply {}", self.moves_made());
        Ok(())
    }
}
