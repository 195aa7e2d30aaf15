// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Definition of the `Board` type, the 8x8 grid of squares that pieces stand
//! on. The board is a plain mailbox: one slot per square, each either empty
//! or holding exactly one piece. It knows nothing about whose turn it is or
//! what moves are legal; that lives in `position` and `movement`.
use std::fmt;

use crate::types::TableIndex;
use crate::types::{Color, Piece, PieceKind, Square};

#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    pub const fn empty() -> Board {
        Board {
            squares: [None; 64],
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.as_index()]
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Whether `square` holds a piece of the given color.
    pub fn is_occupied_by(&self, square: Square, color: Color) -> bool {
        match self.piece_at(square) {
            Some(piece) => piece.color == color,
            None => false,
        }
    }

    /// Puts a piece on a square, returning whatever stood there before.
    pub fn set(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.squares[square.as_index()].replace(piece)
    }

    /// Empties a square, returning whatever stood there before.
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.as_index()].take()
    }

    /// Iterates every occupied square of the given color in index order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(move |(idx, occupant)| match occupant {
                Some(piece) if piece.color == color => Some((Square::from_index(idx), *piece)),
                _ => None,
            })
    }

    /// Locates the king of the given color with a linear scan.
    pub fn king(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }

    pub fn count(&self, color: Color, kind: PieceKind) -> usize {
        self.pieces(color)
            .filter(|(_, piece)| piece.kind == kind)
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.squares.chunks(8) {
            for occupant in row {
                match occupant {
                    Some(piece) => write!(f, "{}", piece)?,
                    None => write!(f, ".")?,
                }
            }

            writeln!(f)?;
        }

        Ok(())
    }
}
