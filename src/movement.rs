// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-piece movement rules. The question answered here is "can the piece on
//! `from` travel to `to`", judged by the piece's geometry and by whatever
//! stands in its way, but without regard to whether the move leaves its own
//! king in check. That final filter is applied by `Position::is_legal`.
//!
//! Two rules need more than the board: en passant depends on the position's
//! en-passant file, and castling depends on which home pieces have moved and
//! on attack detection.
use crate::attacks;
use crate::board::Board;
use crate::position::Position;
use crate::types::{Color, HomeSquares, PieceKind, Square};

/// Returns whether the piece on `from` may move to `to` by its movement rules
/// alone. Returns false if `from` is empty.
///
/// This does not reject a destination holding one of the mover's own pieces;
/// that is checked by the caller before asking.
pub fn is_shape_legal(pos: &Position, from: Square, to: Square) -> bool {
    let piece = match pos.piece_at(from) {
        Some(piece) => piece,
        None => return false,
    };

    let board = pos.board();
    match piece.kind {
        PieceKind::Pawn => {
            pawn_push_reaches(board, piece.color, from, to)
                || pawn_capture_reaches(board, piece.color, from, to)
                || is_en_passant(pos, piece.color, from, to)
        }
        PieceKind::Knight => knight_reaches(from, to),
        PieceKind::Bishop => bishop_reaches(board, from, to),
        PieceKind::Rook => rook_reaches(board, from, to),
        PieceKind::Queen => queen_reaches(board, from, to),
        PieceKind::King => king_reaches(from, to) || is_castle_legal(pos, piece.color, from, to),
    }
}

fn deltas(from: Square, to: Square) -> (i32, i32) {
    (to.row() - from.row(), to.col() - from.col())
}

/// Whether every square strictly between `from` and `to` is empty. The two
/// squares must share a row, a column or a diagonal.
pub(crate) fn path_is_clear(board: &Board, from: Square, to: Square) -> bool {
    let (drow, dcol) = deltas(from, to);
    debug_assert!(drow == 0 || dcol == 0 || drow.abs() == dcol.abs());
    let (step_row, step_col) = (drow.signum(), dcol.signum());
    let mut current = from;
    loop {
        current = match current.offset(step_row, step_col) {
            Some(next) => next,
            None => return false,
        };

        if current == to {
            return true;
        }

        if !board.is_empty(current) {
            return false;
        }
    }
}

pub(crate) fn knight_reaches(from: Square, to: Square) -> bool {
    let (drow, dcol) = deltas(from, to);
    match (drow.abs(), dcol.abs()) {
        (2, 1) | (1, 2) => true,
        _ => false,
    }
}

pub(crate) fn bishop_reaches(board: &Board, from: Square, to: Square) -> bool {
    let (drow, dcol) = deltas(from, to);
    drow != 0 && drow.abs() == dcol.abs() && path_is_clear(board, from, to)
}

pub(crate) fn rook_reaches(board: &Board, from: Square, to: Square) -> bool {
    let (drow, dcol) = deltas(from, to);
    from != to && (drow == 0 || dcol == 0) && path_is_clear(board, from, to)
}

pub(crate) fn queen_reaches(board: &Board, from: Square, to: Square) -> bool {
    rook_reaches(board, from, to) || bishop_reaches(board, from, to)
}

/// A single king step. Castling is handled separately.
pub(crate) fn king_reaches(from: Square, to: Square) -> bool {
    let (drow, dcol) = deltas(from, to);
    drow.abs().max(dcol.abs()) == 1
}

fn pawn_push_reaches(board: &Board, color: Color, from: Square, to: Square) -> bool {
    let (drow, dcol) = deltas(from, to);
    if dcol != 0 || !board.is_empty(to) {
        return false;
    }

    let forward = color.forward();
    if drow == forward {
        return true;
    }

    // Two steps from the starting row, through an empty square.
    if drow == 2 * forward && from.row() == color.pawn_row() {
        return match from.offset(forward, 0) {
            Some(passed) => board.is_empty(passed),
            None => false,
        };
    }

    false
}

fn pawn_capture_reaches(board: &Board, color: Color, from: Square, to: Square) -> bool {
    let (drow, dcol) = deltas(from, to);
    drow == color.forward() && dcol.abs() == 1 && board.is_occupied_by(to, color.toggle())
}

/// The row a pawn of this color must stand on to capture en passant.
fn en_passant_row(color: Color) -> i32 {
    match color {
        Color::White => 3,
        Color::Black => 4,
    }
}

/// Whether a pawn of `color` on `from` may capture en passant by moving to
/// `to`. The captured pawn stands beside the mover, not on `to`.
pub(crate) fn is_en_passant(pos: &Position, color: Color, from: Square, to: Square) -> bool {
    // The en-passant file is only good for the move right after the double
    // step, which is always the opponent's move.
    if pos.side_to_move() != color || pos.en_passant_file() != Some(to.file()) {
        return false;
    }

    let (drow, dcol) = deltas(from, to);
    if from.row() != en_passant_row(color) || drow != color.forward() || dcol.abs() != 1 {
        return false;
    }

    let board = pos.board();
    if !board.is_empty(to) {
        return false;
    }

    match Square::from_coords(from.row(), to.col()).and_then(|sq| board.piece_at(sq)) {
        Some(passed) => passed.kind == PieceKind::Pawn && passed.color != color,
        None => false,
    }
}

/// Geometry of one of the four castling moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Castle {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    /// Where the rook lands. This is also the square the king passes over.
    pub rook_to: Square,
    /// Squares between king and rook that must be empty.
    pub between: &'static [Square],
    pub rook_flag: HomeSquares,
}

/// Looks up the castle that moves a king of `color` to `king_to`, if there is
/// one.
pub(crate) fn castle_for(color: Color, king_to: Square) -> Option<Castle> {
    let castle = match (color, king_to) {
        (Color::White, Square::G1) => Castle {
            king_from: Square::E1,
            king_to,
            rook_from: Square::H1,
            rook_to: Square::F1,
            between: &[Square::F1, Square::G1],
            rook_flag: HomeSquares::WHITE_ROOK_H,
        },
        (Color::White, Square::C1) => Castle {
            king_from: Square::E1,
            king_to,
            rook_from: Square::A1,
            rook_to: Square::D1,
            between: &[Square::B1, Square::C1, Square::D1],
            rook_flag: HomeSquares::WHITE_ROOK_A,
        },
        (Color::Black, Square::G8) => Castle {
            king_from: Square::E8,
            king_to,
            rook_from: Square::H8,
            rook_to: Square::F8,
            between: &[Square::F8, Square::G8],
            rook_flag: HomeSquares::BLACK_ROOK_H,
        },
        (Color::Black, Square::C8) => Castle {
            king_from: Square::E8,
            king_to,
            rook_from: Square::A8,
            rook_to: Square::D8,
            between: &[Square::B8, Square::C8, Square::D8],
            rook_flag: HomeSquares::BLACK_ROOK_A,
        },
        _ => return None,
    };

    Some(castle)
}

/// Whether the king of `color` on `from` may castle by moving to `to`.
///
/// Castling requires that neither the king nor the chosen rook has ever left
/// its home square, that the rook is still there, that every square between
/// them is empty, and that the king does not start on, pass over or land on an
/// attacked square.
pub(crate) fn is_castle_legal(pos: &Position, color: Color, from: Square, to: Square) -> bool {
    let castle = match castle_for(color, to) {
        Some(castle) if castle.king_from == from => castle,
        _ => return false,
    };

    let departed = pos.departed();
    if departed.contains(HomeSquares::king(color)) || departed.contains(castle.rook_flag) {
        trace!("castle {}{} rejected: king or rook has moved", from, to);
        return false;
    }

    let board = pos.board();
    match board.piece_at(castle.rook_from) {
        Some(rook) if rook.kind == PieceKind::Rook && rook.color == color => {}
        _ => return false,
    }

    if !castle.between.iter().all(|&sq| board.is_empty(sq)) {
        return false;
    }

    let enemy = color.toggle();
    let crossed = [castle.king_from, castle.rook_to, castle.king_to];
    if crossed.iter().any(|&sq| attacks::is_attacked(board, sq, enemy)) {
        trace!("castle {}{} rejected: king crosses an attacked square", from, to);
        return false;
    }

    true
}
