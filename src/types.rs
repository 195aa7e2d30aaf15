// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use num_traits::{FromPrimitive, ToPrimitive};
use std::convert::TryFrom;
use std::fmt::{self, Display, Write};

// TableIndex is a trait for all types that can serve as an index into a table.
// The board is a flat table of 64 squares, so squares, files and ranks all get
// converted back and forth through this trait.
pub trait TableIndex {
    fn as_index(self) -> usize;
    fn from_index(idx: usize) -> Self;
}

impl<T> TableIndex for T
where
    T: FromPrimitive + ToPrimitive,
{
    fn as_index(self) -> usize {
        self.to_u32().unwrap() as usize
    }

    fn from_index(idx: usize) -> T {
        <T as FromPrimitive>::from_u64(idx as u64).unwrap()
    }
}

/// A square on the board. Squares are numbered row-major starting from a8,
/// White's far corner, so that `square as usize == row * 8 + col` where row 0 is
/// the eighth rank and column 0 is the a-file.
#[rustfmt::skip]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Square {
    A8, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1,
}

impl Square {
    pub fn of(rank: Rank, file: File) -> Square {
        let row = 7 - rank.as_index();
        Square::from_index(row * 8 + file.as_index())
    }

    /// Returns the square at the given grid coordinates, or `None` if the
    /// coordinates fall off the board.
    pub fn from_coords(row: i32, col: i32) -> Option<Square> {
        if row < 0 || row > 7 || col < 0 || col > 7 {
            return None;
        }

        Some(Square::from_index((row * 8 + col) as usize))
    }

    /// All 64 squares, in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_index)
    }

    pub fn row(self) -> i32 {
        (self.as_index() >> 3) as i32
    }

    pub fn col(self) -> i32 {
        (self.as_index() & 7) as i32
    }

    pub fn rank(self) -> Rank {
        Rank::from_index(7 - (self.as_index() >> 3))
    }

    pub fn file(self) -> File {
        File::from_index(self.as_index() & 7)
    }

    pub fn offset(self, drow: i32, dcol: i32) -> Option<Square> {
        Square::from_coords(self.row() + drow, self.col() + dcol)
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

impl Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char((b'1' + self.as_index() as u8) as char)
    }
}

impl TryFrom<char> for Rank {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '1'..='8' => Ok(Rank::from_index(value as usize - '1' as usize)),
            _ => Err(()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char((b'a' + self.as_index() as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'a'..='h' => Ok(File::from_index(value as usize - 'a' as usize)),
            _ => Err(()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a single pawn step for this color. White marches toward
    /// row 0.
    pub fn forward(self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn pawn_row(self) -> i32 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// The row on which this color's pawns promote.
    pub fn last_row(self) -> i32 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

pub static COLORS: [Color; 2] = [Color::White, Color::Black];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Lower-case FEN letter for this kind.
    pub fn as_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// Whether a pawn may be promoted to this kind.
    pub fn is_promotion_target(self) -> bool {
        match self {
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => true,
            PieceKind::Pawn | PieceKind::King => false,
        }
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.as_char())
    }
}

impl TryFrom<char> for PieceKind {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let kind = match value.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(()),
        };
        Ok(kind)
    }
}

pub static PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

bitflags! {
    /// Records which of the original kings and rooks have ever left their home
    /// squares. A rook captured where it stands counts as having left. Bits are
    /// only ever added; a piece that later lands on a home square does not
    /// restore anything.
    pub struct HomeSquares: u8 {
        const NONE = 0;
        const WHITE_KING = 0b0000_0001;
        const WHITE_ROOK_A = 0b0000_0010;
        const WHITE_ROOK_H = 0b0000_0100;
        const WHITE = Self::WHITE_KING.bits | Self::WHITE_ROOK_A.bits | Self::WHITE_ROOK_H.bits;
        const BLACK_KING = 0b0000_1000;
        const BLACK_ROOK_A = 0b0001_0000;
        const BLACK_ROOK_H = 0b0010_0000;
        const BLACK = Self::BLACK_KING.bits | Self::BLACK_ROOK_A.bits | Self::BLACK_ROOK_H.bits;
    }
}

impl HomeSquares {
    pub fn king(color: Color) -> HomeSquares {
        match color {
            Color::White => HomeSquares::WHITE_KING,
            Color::Black => HomeSquares::BLACK_KING,
        }
    }

    pub fn kingside_rook(color: Color) -> HomeSquares {
        match color {
            Color::White => HomeSquares::WHITE_ROOK_H,
            Color::Black => HomeSquares::BLACK_ROOK_H,
        }
    }

    pub fn queenside_rook(color: Color) -> HomeSquares {
        match color {
            Color::White => HomeSquares::WHITE_ROOK_A,
            Color::Black => HomeSquares::BLACK_ROOK_A,
        }
    }

    /// The flag for the original rook whose home is `square`, if any.
    pub fn rook_at(square: Square) -> Option<HomeSquares> {
        match square {
            Square::A1 => Some(HomeSquares::WHITE_ROOK_A),
            Square::H1 => Some(HomeSquares::WHITE_ROOK_H),
            Square::A8 => Some(HomeSquares::BLACK_ROOK_A),
            Square::H8 => Some(HomeSquares::BLACK_ROOK_H),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }
}

impl TryFrom<char> for Piece {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let kind = PieceKind::try_from(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Piece::new(kind, color))
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = self.kind.as_char();
        match self.color {
            Color::White => f.write_char(chr.to_ascii_uppercase()),
            Color::Black => f.write_char(chr),
        }
    }
}
