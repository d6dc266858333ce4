//! Mosaic stacking-game rules engine on bit-vector layered boards.
//!
//! # Board Encoding
//!
//! ```text
//! A board of size s stacks square layers of side 1..=s into one bit vector
//! of capacity Σ_{k=1}^{s} k² (1, 5, 14, 30, 55, 91, 140 for s = 1..=7).
//!
//! Layer k starts at offset Σ_{i<k} i² and is row-major:
//!   offset(k, r, c) = Σ_{i<k} i² + r·k + c
//!
//! Layer 1 is the apex, layer s the ground. Cell (r, c) of layer n-1 rests on
//! (r, c) (r, c+1) (r+1, c) (r+1, c+1) of layer n.
//!
//! Text form is MSB first: the rightmost character is offset 0.
//!   size 3 ground  = "11111111100000"
//!   size 3 neutral = "00001000000000"   (centre of the ground layer)
//! ```
//!
//! # Matches
//!
//! ```text
//! occupied   = OR(participant boards, neutral)
//! scaffolded = ground OR occupied.promote(Four)
//! legal      = NOT occupied AND scaffolded
//! ```
//!
//! After each move, every participant gains the legal cells where it holds
//! a majority (head to head) or half (teams) of the footprint, up to its
//! quota, until a pass adds nothing.

pub mod bitvec;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
mod geometry;
pub mod moves;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use bitvec::BitVector;
pub use board::{Board, Promotion, Symmetry, MAX_SIZE};
pub use config::MatchConfig;
pub use error::{Error, ErrorKind, Result};
pub use game::{Match, MatchRecord, Side, Variant};
pub use geometry::{capacity_of, layer_offset};
pub use moves::Move;
