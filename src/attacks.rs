// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Attack detection. A square is attacked by a color if any piece of that
//! color could capture on it, were an enemy piece standing there.
//!
//! Attacks differ from moves in two places. Pawns attack both forward
//! diagonals whether or not anything stands there, and never attack the
//! square in front of them. Kings attack only their neighbours; castling
//! never attacks anything. All other pieces attack exactly the squares they
//! can move to.
//!
//! The attacking color is always an explicit argument. Nothing here reads or
//! changes whose turn it is.
use crate::board::Board;
use crate::movement;
use crate::types::{Color, Piece, PieceKind, Square};

/// Whether `piece`, standing on `from`, attacks `target`.
pub fn piece_attacks(board: &Board, piece: Piece, from: Square, target: Square) -> bool {
    match piece.kind {
        PieceKind::Pawn => {
            target.row() - from.row() == piece.color.forward()
                && (target.col() - from.col()).abs() == 1
        }
        PieceKind::Knight => movement::knight_reaches(from, target),
        PieceKind::Bishop => movement::bishop_reaches(board, from, target),
        PieceKind::Rook => movement::rook_reaches(board, from, target),
        PieceKind::Queen => movement::queen_reaches(board, from, target),
        PieceKind::King => movement::king_reaches(from, target),
    }
}

/// Iterates the squares of every piece of color `by` that attacks `target`.
pub fn attackers<'a>(
    board: &'a Board,
    target: Square,
    by: Color,
) -> impl Iterator<Item = Square> + 'a {
    board
        .pieces(by)
        .filter(move |&(square, piece)| piece_attacks(board, piece, square, target))
        .map(|(square, _)| square)
}

/// Whether any piece of color `by` attacks `target`. Stops at the first
/// attacker found.
pub fn is_attacked(board: &Board, target: Square, by: Color) -> bool {
    attackers(board, target, by).next().is_some()
}
