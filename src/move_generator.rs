// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move enumeration. The movement rules are phrased as predicates over a
//! source and destination square, so generation is a sweep: every piece of
//! the mover's color, paired with every square of the board, filtered by
//! `Position::is_pseudo_legal`.
use arrayvec::ArrayVec;

use crate::moves::Move;
use crate::position::Position;
use crate::types::{Color, Square};

/// No chess position has more than 218 legal moves; 256 leaves room for the
/// pseudo-legal ones as well.
pub type MoveVec = ArrayVec<[Move; 256]>;

/// Lazily yields every pseudo-legal move for `color`, in board order of the
/// moving piece and then of the destination.
pub fn pseudo_legal_moves<'a>(pos: &'a Position, color: Color) -> impl Iterator<Item = Move> + 'a {
    pos.board().pieces(color).flat_map(move |(source, _)| {
        Square::all()
            .map(move |dest| Move::new(source, dest))
            .filter(move |&mov| pos.is_pseudo_legal(color, mov))
    })
}

#[derive(Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> MoveGenerator {
        MoveGenerator
    }

    /// Fills `moves` with the pseudo-legal moves of the side to move. These
    /// may leave the mover's own king in check.
    pub fn generate_moves(&self, pos: &Position, moves: &mut MoveVec) {
        moves.extend(pseudo_legal_moves(pos, pos.side_to_move()));
    }

    /// Fills `moves` with the legal moves of the side to move. Every move
    /// produced here is accepted by `Position::is_legal`.
    pub fn generate_legal_moves(&self, pos: &Position, moves: &mut MoveVec) {
        let color = pos.side_to_move();
        moves.extend(
            pseudo_legal_moves(pos, color).filter(|&mov| pos.leaves_king_safe(color, mov)),
        );
    }
}
