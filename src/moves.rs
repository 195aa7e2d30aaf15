// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `moves` module contains the definition of a `Move` as the rules engine
//! sees it: nothing more than a source and a destination square.
//!
//! Unlike an encoding that tags captures, castles and promotions up front,
//! every special effect of a move is derived from the position it is applied
//! to. A king travelling two files is a castle, a pawn stepping diagonally onto
//! an empty square is an en-passant capture, and so on. Promotion is not part
//! of a move at all; the caller picks the new piece after the move has been
//! accepted (see `Position::promote`).
use std::fmt;

use crate::types::Square;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    source: Square,
    destination: Square,
}

impl Move {
    pub fn new(source: Square, destination: Square) -> Move {
        Move {
            source,
            destination,
        }
    }

    pub fn source(self) -> Square {
        self.source
    }

    pub fn destination(self) -> Square {
        self.destination
    }

    /// Row delta of this move, positive toward White's side of the board.
    pub fn row_delta(self) -> i32 {
        self.destination.row() - self.source.row()
    }

    /// Column delta of this move, positive toward the h-file.
    pub fn col_delta(self) -> i32 {
        self.destination.col() - self.source.col()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.source, self.destination)
    }
}
