// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A rules engine for two-player chess. Given a position, it answers whether a
//! move is legal, applies moves with all of their side effects, and detects
//! check, checkmate and stalemate.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;

pub mod attacks;
mod board;
mod move_generator;
pub mod movement;
mod moves;
mod perft;
mod position;
mod types;

pub use board::Board;
pub use move_generator::{pseudo_legal_moves, MoveGenerator, MoveVec};
pub use moves::Move;
pub use perft::perft;
pub use position::{FenParseError, GameStatus, Position, PromotionError};
pub use types::{
    Color, File, HomeSquares, Piece, PieceKind, Rank, Square, COLORS, PROMOTION_KINDS,
};
