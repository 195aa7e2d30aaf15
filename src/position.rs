// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::error::Error;
use std::fmt::{self, Write};

use crate::attacks;
use crate::board::Board;
use crate::move_generator;
use crate::movement;
use crate::moves::Move;
use crate::types::TableIndex;
use crate::types::{Color, File, HomeSquares, Piece, PieceKind, Rank, Square};

/// Possible errors that can arise when parsing a FEN string into a `Position`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    MissingField,
    WrongRankCount,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece(char),
    InvalidSideToMove,
    InvalidCastle,
    InvalidEnPassant,
    InvalidHalfmove,
    InvalidFullmove,
    TrailingInput,
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FenParseError::MissingField => write!(f, "FEN is missing a field"),
            FenParseError::WrongRankCount => write!(f, "FEN board does not have eight ranks"),
            FenParseError::InvalidDigit => write!(f, "empty-square count must be 1 through 8"),
            FenParseError::FileDoesNotSumToEight => write!(f, "FEN rank does not sum to eight files"),
            FenParseError::UnknownPiece(c) => write!(f, "unknown piece letter '{}'", c),
            FenParseError::InvalidSideToMove => write!(f, "side to move must be 'w' or 'b'"),
            FenParseError::InvalidCastle => write!(f, "invalid castling field"),
            FenParseError::InvalidEnPassant => write!(f, "invalid en-passant field"),
            FenParseError::InvalidHalfmove => write!(f, "invalid halfmove clock"),
            FenParseError::InvalidFullmove => write!(f, "invalid fullmove number"),
            FenParseError::TrailingInput => write!(f, "unexpected input after FEN"),
        }
    }
}

impl Error for FenParseError {}

/// Ways in which a promotion request can be malformed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PromotionError {
    /// There is no pawn on the requested square.
    NoPawn,
    /// The pawn has not reached its last rank.
    NotOnLastRank,
    /// Pawns may only become knights, bishops, rooks or queens.
    InvalidKind,
}

impl fmt::Display for PromotionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PromotionError::NoPawn => write!(f, "no pawn on the promotion square"),
            PromotionError::NotOnLastRank => write!(f, "pawn has not reached its last rank"),
            PromotionError::InvalidKind => write!(f, "pawns promote to a queen, rook, bishop or knight"),
        }
    }
}

impl Error for PromotionError {}

/// The state of the game from the point of view of the side to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
        };
        f.write_str(text)
    }
}

/// A complete game state: the board, whose turn it is, which home pieces have
/// moved and which file (if any) may be captured en passant on this move.
///
/// A `Position` is a plain value. Cloning it gives an independent scratch copy,
/// which is how every speculative move is tried; the original is never touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    departed: HomeSquares,
    en_passant_file: Option<File>,
    halfmove_clock: u32,
    fullmove_clock: u32,
}

static BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

//
// Board state getters
//

impl Position {
    /// An empty board with White to move and no castling available.
    pub fn new() -> Position {
        Position {
            board: Board::empty(),
            side_to_move: Color::White,
            departed: HomeSquares::WHITE | HomeSquares::BLACK,
            en_passant_file: None,
            halfmove_clock: 0,
            fullmove_clock: 1,
        }
    }

    /// The standard starting position. White moves first, every castle is
    /// still available and there is no en-passant file.
    pub fn initial() -> Position {
        let mut pos = Position::new();
        for (idx, &kind) in BACK_RANK.iter().enumerate() {
            let file = File::from_index(idx);
            pos.board
                .set(Square::of(Rank::One, file), Piece::new(kind, Color::White));
            pos.board.set(
                Square::of(Rank::Two, file),
                Piece::new(PieceKind::Pawn, Color::White),
            );
            pos.board.set(
                Square::of(Rank::Seven, file),
                Piece::new(PieceKind::Pawn, Color::Black),
            );
            pos.board
                .set(Square::of(Rank::Eight, file), Piece::new(kind, Color::Black));
        }

        pos.departed = HomeSquares::NONE;
        pos
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The file of a pawn that just advanced two squares, if the previous move
    /// was such an advance.
    pub fn en_passant_file(&self) -> Option<File> {
        self.en_passant_file
    }

    /// The set of original kings and rooks that have left their home squares.
    pub fn departed(&self) -> HomeSquares {
        self.departed
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_clock(&self) -> u32 {
        self.fullmove_clock
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        !self
            .departed
            .intersects(HomeSquares::king(color) | HomeSquares::kingside_rook(color))
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        !self
            .departed
            .intersects(HomeSquares::king(color) | HomeSquares::queenside_rook(color))
    }
}

//
// Move application
//

impl Position {
    /// Applies a move and all of its side effects: captures (including en
    /// passant), the rook's half of a castle, the en-passant file and the
    /// departed flags. Afterwards it is the other color's turn.
    ///
    /// The move must have been accepted by `is_legal` (or at least be
    /// pseudo-legal, for simulation). Panics if there is no piece on the
    /// source square.
    pub fn apply_move(&mut self, mov: Move) {
        let source = mov.source();
        let dest = mov.destination();
        let moving_piece = self
            .board
            .piece_at(source)
            .expect("invalid move: no piece at source square");
        let color = moving_piece.color;

        // Special moves have to be recognized before the board changes: an
        // en-passant capture is a diagonal pawn step onto an empty square.
        let is_en_passant = moving_piece.kind == PieceKind::Pawn
            && mov.col_delta().abs() == 1
            && self.board.is_empty(dest);
        let castle = if moving_piece.kind == PieceKind::King && mov.col_delta().abs() == 2 {
            movement::castle_for(color, dest).filter(|castle| castle.king_from == source)
        } else {
            None
        };

        self.board.take(source);
        let mut captured = self.board.set(dest, moving_piece);
        if is_en_passant {
            // The captured pawn sits one row behind the destination, on the
            // mover's side.
            let passed = dest
                .offset(-color.forward(), 0)
                .expect("invalid move: en passant capture off the board");
            captured = self.board.take(passed);
        }

        if let Some(castle) = castle {
            let rook = self
                .board
                .take(castle.rook_from)
                .expect("invalid move: castle without rook");
            self.board.set(castle.rook_to, rook);
        }

        // The en-passant file lasts for exactly one move.
        self.en_passant_file =
            if moving_piece.kind == PieceKind::Pawn && mov.row_delta().abs() == 2 {
                Some(source.file())
            } else {
                None
            };

        match moving_piece.kind {
            PieceKind::King => self.departed |= HomeSquares::king(color),
            PieceKind::Rook => {
                if let Some(flag) = HomeSquares::rook_at(source) {
                    self.departed |= flag;
                }
            }
            _ => {}
        }

        // A rook captured on its home square can never castle either.
        if captured.is_some() {
            if let Some(flag) = HomeSquares::rook_at(dest) {
                self.departed |= flag;
            }
        }

        if captured.is_some() || moving_piece.kind == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if color == Color::Black {
            self.fullmove_clock = self.fullmove_clock.saturating_add(1);
        }

        self.side_to_move = color.toggle();
    }

    /// Returns the position that results from applying `mov`, leaving this one
    /// unchanged.
    pub fn with_move(&self, mov: Move) -> Position {
        let mut next = self.clone();
        next.apply_move(mov);
        next
    }

    /// Returns the color of the pawn standing on `square` if it has reached its
    /// last rank and must be promoted.
    pub fn requires_promotion(&self, square: Square) -> Option<Color> {
        match self.board.piece_at(square) {
            Some(piece) if piece.kind == PieceKind::Pawn && square.row() == piece.color.last_row() => {
                Some(piece.color)
            }
            _ => None,
        }
    }

    /// Replaces the pawn on `square`, which must be on its last rank, with a
    /// piece of the given kind and the same color.
    pub fn promote(&mut self, square: Square, kind: PieceKind) -> Result<(), PromotionError> {
        if !kind.is_promotion_target() {
            return Err(PromotionError::InvalidKind);
        }

        let color = match self.board.piece_at(square) {
            Some(piece) if piece.kind == PieceKind::Pawn => self
                .requires_promotion(square)
                .ok_or(PromotionError::NotOnLastRank)?,
            _ => return Err(PromotionError::NoPawn),
        };

        self.board.set(square, Piece::new(kind, color));
        debug!("promoted {} pawn on {} to {}", color, square, kind);
        Ok(())
    }
}

//
// Legality, check and mobility
//

impl Position {
    /// Whether `mov` obeys the movement rules for a piece of `color`: the
    /// source holds such a piece, the destination does not hold a piece of the
    /// same color, and the piece's geometry allows it. Self-check is not
    /// considered.
    pub fn is_pseudo_legal(&self, color: Color, mov: Move) -> bool {
        if !self.board.is_occupied_by(mov.source(), color) {
            return false;
        }

        match self.board.piece_at(mov.destination()) {
            Some(target) if target.color == color => return false,
            // Kings are never captured; a position where one could be is
            // already broken.
            Some(target) if target.kind == PieceKind::King => return false,
            _ => {}
        }

        movement::is_shape_legal(self, mov.source(), mov.destination())
    }

    /// Full legality test for the side to move. A move is legal if it is
    /// pseudo-legal and the mover's king is not attacked once it has been
    /// played. Rejection is an ordinary answer, not an error.
    pub fn is_legal(&self, mov: Move) -> bool {
        let color = self.side_to_move;
        if !self.is_pseudo_legal(color, mov) {
            debug!("rejecting {}: not a {} move by the movement rules", mov, color);
            return false;
        }

        if !self.leaves_king_safe(color, mov) {
            debug!("rejecting {}: leaves the {} king in check", mov, color);
            return false;
        }

        true
    }

    /// Plays `mov` on a scratch copy and reports whether the king of `color`
    /// is safe afterwards.
    pub(crate) fn leaves_king_safe(&self, color: Color, mov: Move) -> bool {
        !self.with_move(mov).is_check(color)
    }

    /// Whether the king of `color` is attacked.
    ///
    /// Panics if `color` has no king on the board; such a position is corrupt.
    pub fn is_check(&self, color: Color) -> bool {
        let king = match self.board.king(color) {
            Some(king) => king,
            None => panic!("corrupt position: no {} king on the board", color),
        };

        attacks::is_attacked(&self.board, king, color.toggle())
    }

    /// Whether `color` has at least one legal move. Every pseudo-legal move is
    /// tried on a scratch copy until one leaves the king safe.
    pub fn has_any_legal_move(&self, color: Color) -> bool {
        move_generator::pseudo_legal_moves(self, color).any(|mov| self.leaves_king_safe(color, mov))
    }

    pub fn status(&self) -> GameStatus {
        let color = self.side_to_move;
        match (self.is_check(color), self.has_any_legal_move(color)) {
            (true, true) => GameStatus::Check,
            (true, false) => GameStatus::Checkmate,
            (false, true) => GameStatus::Ongoing,
            (false, false) => GameStatus::Stalemate,
        }
    }

    pub fn is_checkmate(&self) -> bool {
        self.status() == GameStatus::Checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.status() == GameStatus::Stalemate
    }

    pub fn is_game_over(&self) -> bool {
        match self.status() {
            GameStatus::Checkmate | GameStatus::Stalemate => true,
            GameStatus::Ongoing | GameStatus::Check => false,
        }
    }
}

//
// FEN parsing and generation.
//

impl Position {
    /// Constructs a new position from a FEN string. The two clock fields are
    /// optional and default to `0 1`.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Position, FenParseError> {
        let mut fields = fen.as_ref().split_whitespace();
        let placement = fields.next().ok_or(FenParseError::MissingField)?;
        let side = fields.next().ok_or(FenParseError::MissingField)?;
        let castle = fields.next().ok_or(FenParseError::MissingField)?;
        let en_passant = fields.next().ok_or(FenParseError::MissingField)?;
        let halfmove = fields.next();
        let fullmove = fields.next();
        if fields.next().is_some() {
            return Err(FenParseError::TrailingInput);
        }

        let mut pos = Position::new();
        pos.board = parse_placement(placement)?;
        pos.side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenParseError::InvalidSideToMove),
        };
        pos.departed = parse_castle(castle)?;
        pos.en_passant_file = parse_en_passant(en_passant)?;
        if let Some(clock) = halfmove {
            pos.halfmove_clock = clock
                .parse()
                .map_err(|_| FenParseError::InvalidHalfmove)?;
        }

        if let Some(clock) = fullmove {
            pos.fullmove_clock = clock
                .parse()
                .map_err(|_| FenParseError::InvalidFullmove)?;
        }

        Ok(pos)
    }

    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for row in 0..8 {
            let mut empty_squares = 0;
            for col in 0..8 {
                let square = Square::from_index(row * 8 + col);
                match self.board.piece_at(square) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            buf.push_str(&empty_squares.to_string());
                            empty_squares = 0;
                        }
                        buf.push_str(&piece.to_string());
                    }
                    None => empty_squares += 1,
                }
            }

            if empty_squares != 0 {
                buf.push_str(&empty_squares.to_string());
            }

            if row != 7 {
                buf.push('/');
            }
        }

        buf.push(' ');
        buf.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        buf.push(' ');
        let castle_start = buf.len();
        if self.can_castle_kingside(Color::White) {
            buf.push('K');
        }
        if self.can_castle_queenside(Color::White) {
            buf.push('Q');
        }
        if self.can_castle_kingside(Color::Black) {
            buf.push('k');
        }
        if self.can_castle_queenside(Color::Black) {
            buf.push('q');
        }
        if buf.len() == castle_start {
            buf.push('-');
        }

        buf.push(' ');
        match self.en_passant_file {
            Some(file) => {
                // The target square is the one the double-stepping pawn passed over.
                let rank = match self.side_to_move {
                    Color::White => Rank::Six,
                    Color::Black => Rank::Three,
                };
                buf.push_str(&Square::of(rank, file).to_string());
            }
            None => buf.push('-'),
        }

        buf.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_clock));
        buf
    }
}

fn parse_placement(placement: &str) -> Result<Board, FenParseError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(FenParseError::WrongRankCount);
    }

    let mut board = Board::empty();
    for (row, text) in rows.iter().enumerate() {
        let mut col = 0;
        for c in text.chars() {
            if let Some(skip) = c.to_digit(10) {
                if skip < 1 || skip > 8 {
                    return Err(FenParseError::InvalidDigit);
                }

                col += skip as usize;
            } else {
                let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
                if col >= 8 {
                    return Err(FenParseError::FileDoesNotSumToEight);
                }

                board.set(Square::from_index(row * 8 + col), piece);
                col += 1;
            }

            if col > 8 {
                return Err(FenParseError::FileDoesNotSumToEight);
            }
        }

        if col != 8 {
            return Err(FenParseError::FileDoesNotSumToEight);
        }
    }

    Ok(board)
}

fn parse_castle(castle: &str) -> Result<HomeSquares, FenParseError> {
    // Every castle not listed is treated as lost for good.
    let mut departed = HomeSquares::WHITE | HomeSquares::BLACK;
    if castle == "-" {
        return Ok(departed);
    }

    for c in castle.chars() {
        let available = match c {
            'K' => HomeSquares::WHITE_KING | HomeSquares::WHITE_ROOK_H,
            'Q' => HomeSquares::WHITE_KING | HomeSquares::WHITE_ROOK_A,
            'k' => HomeSquares::BLACK_KING | HomeSquares::BLACK_ROOK_H,
            'q' => HomeSquares::BLACK_KING | HomeSquares::BLACK_ROOK_A,
            _ => return Err(FenParseError::InvalidCastle),
        };
        departed.remove(available);
    }

    Ok(departed)
}

fn parse_en_passant(field: &str) -> Result<Option<File>, FenParseError> {
    if field == "-" {
        return Ok(None);
    }

    let chars: Vec<char> = field.chars().collect();
    if chars.len() != 2 {
        return Err(FenParseError::InvalidEnPassant);
    }

    let file = File::try_from(chars[0]).map_err(|_| FenParseError::InvalidEnPassant)?;
    match Rank::try_from(chars[1]) {
        Ok(Rank::Three) | Ok(Rank::Six) => Ok(Some(file)),
        _ => Err(FenParseError::InvalidEnPassant),
    }
}

//
// Trait implementations
//

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "  +-----------------+")?;
        for row in 0..8 {
            write!(f, "{} | ", Square::from_index(row * 8).rank())?;
            for col in 0..8 {
                match self.board.piece_at(Square::from_index(row * 8 + col)) {
                    Some(piece) => write!(f, "{} ", piece)?,
                    None => f.write_str(". ")?,
                }
            }

            writeln!(f, "|")?;
        }

        writeln!(f, "  +-----------------+")?;
        f.write_str("    ")?;
        for col in 0..8 {
            write!(f, "{} ", File::from_index(col))?;
        }

        f.write_char('\n')
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::initial()
    }
}

#[cfg(test)]
mod tests {
    use crate::moves::Move;
    use crate::position::{GameStatus, Position};
    use crate::types::{Color, Square};

    #[test]
    fn initial_position_is_playable() {
        let pos = Position::initial();
        assert_eq!(Color::White, pos.side_to_move());
        assert!(!pos.is_check(Color::White));
        assert!(!pos.is_check(Color::Black));
        assert!(pos.has_any_legal_move(Color::White));
        assert!(pos.has_any_legal_move(Color::Black));
        assert_eq!(GameStatus::Ongoing, pos.status());
    }

    #[test]
    fn check_smoke() {
        let pos =
            Position::from_fen("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1")
                .unwrap();
        assert!(pos.is_check(Color::Black));
        assert!(!pos.is_check(Color::White));
    }

    #[test]
    #[should_panic(expected = "no White king")]
    fn check_without_king_is_fatal() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/8 w - - 0 1").unwrap();
        pos.is_check(Color::White);
    }

    mod fen {
        use crate::position::{FenParseError, Position};
        use crate::types::{Color, File, HomeSquares, Piece, PieceKind, Square};

        #[test]
        fn fen_smoke() {
            let pos = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 0").unwrap();

            // white's turn to move.
            assert_eq!(Color::White, pos.side_to_move());

            // no castling.
            assert!(!pos.can_castle_kingside(Color::White));
            assert!(!pos.can_castle_kingside(Color::Black));
            assert!(!pos.can_castle_queenside(Color::White));
            assert!(!pos.can_castle_queenside(Color::Black));

            // no en passant.
            assert!(pos.en_passant_file().is_none());

            assert_eq!(0, pos.halfmove_clock());
            assert_eq!(0, pos.fullmove_clock());
        }

        #[test]
        fn starting_position_matches_initial() {
            let pos =
                Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                    .unwrap();
            assert_eq!(Position::initial(), pos);
            assert_eq!(
                Some(Piece::new(PieceKind::King, Color::White)),
                pos.piece_at(Square::E1)
            );
            assert_eq!(
                Some(Piece::new(PieceKind::Queen, Color::Black)),
                pos.piece_at(Square::D8)
            );
            assert_eq!(HomeSquares::NONE, pos.departed());
        }

        #[test]
        fn clocks_are_optional() {
            let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
            assert_eq!(Color::Black, pos.side_to_move());
            assert_eq!(0, pos.halfmove_clock());
            assert_eq!(1, pos.fullmove_clock());
        }

        #[test]
        fn partial_castle_rights() {
            let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").unwrap();
            assert!(pos.can_castle_kingside(Color::White));
            assert!(!pos.can_castle_queenside(Color::White));
            assert!(!pos.can_castle_kingside(Color::Black));
            assert!(pos.can_castle_queenside(Color::Black));
            assert!(pos.departed().contains(HomeSquares::WHITE_ROOK_A));
            assert!(!pos.departed().contains(HomeSquares::WHITE_KING));
        }

        #[test]
        fn en_passant_file() {
            let pos = Position::from_fen("4k3/8/8/4Pp2/8/8/8/4K3 w - f6 0 2").unwrap();
            assert_eq!(Some(File::F), pos.en_passant_file());
        }

        #[test]
        fn round_trip() {
            for fen in &[
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
                "4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1",
                "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            ] {
                assert_eq!(*fen, Position::from_fen(fen).unwrap().as_fen());
            }
        }

        #[test]
        fn empty() {
            assert_eq!(Err(FenParseError::MissingField), Position::from_fen(""));
        }

        #[test]
        fn unknown_piece() {
            assert_eq!(
                Err(FenParseError::UnknownPiece('z')),
                Position::from_fen("z7/8/8/8/8/8/8/8 w - - 0 0")
            );
        }

        #[test]
        fn invalid_digit() {
            assert_eq!(
                Err(FenParseError::InvalidDigit),
                Position::from_fen("9/8/8/8/8/8/8/8 w - - 0 0")
            );
        }

        #[test]
        fn not_sum_to_8() {
            assert_eq!(
                Err(FenParseError::FileDoesNotSumToEight),
                Position::from_fen("pppp5/8/8/8/8/8/8/8 w - - 0 0")
            );
            assert_eq!(
                Err(FenParseError::FileDoesNotSumToEight),
                Position::from_fen("ppp/8/8/8/8/8/8/8 w - - 0 0")
            );
        }

        #[test]
        fn wrong_rank_count() {
            assert_eq!(
                Err(FenParseError::WrongRankCount),
                Position::from_fen("8/8/8/8/8/8/8 w - - 0 0")
            );
        }

        #[test]
        fn bad_side_to_move() {
            assert_eq!(
                Err(FenParseError::InvalidSideToMove),
                Position::from_fen("8/8/8/8/8/8/8/8 c - - 0 0")
            );
        }

        #[test]
        fn bad_castle_status() {
            assert_eq!(
                Err(FenParseError::InvalidCastle),
                Position::from_fen("8/8/8/8/8/8/8/8 w a - 0 0")
            );
        }

        #[test]
        fn bad_en_passant() {
            assert_eq!(
                Err(FenParseError::InvalidEnPassant),
                Position::from_fen("8/8/8/8/8/8/8/8 w - 88 0 0")
            );
            assert_eq!(
                Err(FenParseError::InvalidEnPassant),
                Position::from_fen("8/8/8/8/8/8/8/8 w - e4 0 0")
            );
        }

        #[test]
        fn invalid_clocks() {
            assert_eq!(
                Err(FenParseError::InvalidHalfmove),
                Position::from_fen("8/8/8/8/8/8/8/8 w - - x 0")
            );
            assert_eq!(
                Err(FenParseError::InvalidFullmove),
                Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 x")
            );
        }

        #[test]
        fn trailing_input() {
            assert_eq!(
                Err(FenParseError::TrailingInput),
                Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1 extra")
            );
        }
    }

    mod apply {
        use crate::moves::Move;
        use crate::position::Position;
        use crate::types::{Color, File, HomeSquares, PieceKind, Square};

        #[test]
        fn smoke_test_opening_pawn() {
            let mut pos = Position::initial();

            // nothing fancy, move a pawn up one.
            pos.apply_move(Move::new(Square::E2, Square::E3));

            // it should now be Black's turn to move.
            assert_eq!(Color::Black, pos.side_to_move());

            // the fullmove clock only increments after Black moves.
            assert_eq!(1, pos.fullmove_clock());

            // a single step never sets the en-passant file.
            assert_eq!(None, pos.en_passant_file());

            let pawn = pos.piece_at(Square::E3).unwrap();
            assert_eq!(PieceKind::Pawn, pawn.kind);
            assert_eq!(Color::White, pawn.color);
            assert!(pos.piece_at(Square::E2).is_none());
        }

        #[test]
        fn with_move_leaves_original_alone() {
            let pos = Position::initial();
            let next = pos.with_move(Move::new(Square::G1, Square::F3));
            assert_eq!(Position::initial(), pos);
            assert!(next.piece_at(Square::G1).is_none());
            assert_eq!(Color::Black, next.side_to_move());
        }

        #[test]
        fn double_pawn_push_sets_ep() {
            let mut pos = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
            pos.apply_move(Move::new(Square::E2, Square::E4));
            assert_eq!(Color::Black, pos.side_to_move());
            assert_eq!(Some(File::E), pos.en_passant_file());
        }

        #[test]
        fn en_passant_reset() {
            // EP file e, black to move
            let mut pos = Position::from_fen("4k3/8/8/8/4Pp2/8/8/4K3 b - e3 0 1").unwrap();

            // black not taking EP opportunity
            pos.apply_move(Move::new(Square::F4, Square::F3));

            assert_eq!(Color::White, pos.side_to_move());
            assert_eq!(None, pos.en_passant_file());
        }

        #[test]
        fn basic_capture() {
            let mut pos = Position::from_fen("4k3/8/8/8/5p2/4P3/8/4K3 w - - 2 1").unwrap();
            pos.apply_move(Move::new(Square::E3, Square::F4));

            let piece = pos.piece_at(Square::F4).unwrap();
            assert_eq!(PieceKind::Pawn, piece.kind);
            assert_eq!(Color::White, piece.color);
            assert!(pos.piece_at(Square::E3).is_none());
            assert_eq!(0, pos.halfmove_clock());
        }

        #[test]
        fn non_pawn_quiet_move() {
            let mut pos = Position::from_fen("4k3/8/8/8/8/8/4B3/4K3 w - - 5 2").unwrap();
            pos.apply_move(Move::new(Square::E2, Square::G4));
            assert_eq!(6, pos.halfmove_clock());
        }

        #[test]
        fn clocks_stop_at_their_maximum() {
            let mut pos =
                Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 4294967295 1").unwrap();
            pos.apply_move(Move::new(Square::E1, Square::D1));
            assert_eq!(u32::max_value(), pos.halfmove_clock());

            let mut pos =
                Position::from_fen("4k3/8/8/8/8/8/8/3K4 b - - 0 4294967295").unwrap();
            pos.apply_move(Move::new(Square::E8, Square::D8));
            assert_eq!(u32::max_value(), pos.fullmove_clock());
            assert_eq!(1, pos.halfmove_clock());
        }

        #[test]
        fn moving_king_castle_status() {
            let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
            pos.apply_move(Move::new(Square::E1, Square::E2));
            assert!(!pos.can_castle_kingside(Color::White));
            assert!(!pos.can_castle_queenside(Color::White));

            // walking back home does not restore anything.
            pos.apply_move(Move::new(Square::E8, Square::D8));
            pos.apply_move(Move::new(Square::E2, Square::E1));
            assert!(pos.departed().contains(HomeSquares::WHITE_KING));
            assert!(!pos.can_castle_kingside(Color::White));
        }

        #[test]
        fn moving_kingside_rook_castle_status() {
            let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
            pos.apply_move(Move::new(Square::H1, Square::G1));
            assert!(!pos.can_castle_kingside(Color::White));
            assert!(pos.can_castle_queenside(Color::White));
        }

        #[test]
        fn moving_queenside_rook_castle_status() {
            let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
            pos.apply_move(Move::new(Square::A1, Square::B1));
            assert!(!pos.can_castle_queenside(Color::White));
            assert!(pos.can_castle_kingside(Color::White));
        }

        #[test]
        fn rook_capture_castle_status() {
            // a rook captured on its home square loses its castle, and a
            // different rook arriving there later does not bring it back.
            let mut pos = Position::from_fen("4k3/8/8/8/8/7r/4P3/R3K2R b KQ - 0 1").unwrap();
            pos.apply_move(Move::new(Square::H3, Square::H1));
            assert!(!pos.can_castle_kingside(Color::White));

            pos.apply_move(Move::new(Square::E2, Square::E4));
            pos.apply_move(Move::new(Square::H1, Square::H5));
            pos.apply_move(Move::new(Square::A1, Square::A2));
            pos.apply_move(Move::new(Square::H5, Square::H6));
            pos.apply_move(Move::new(Square::A2, Square::H2));
            pos.apply_move(Move::new(Square::H6, Square::H7));
            pos.apply_move(Move::new(Square::H2, Square::H1));

            assert!(!pos.can_castle_kingside(Color::White));
            assert!(!pos.can_castle_queenside(Color::White));
        }

        #[test]
        fn en_passant_capture() {
            // the captured pawn is removed from d5, not from the landing square
            let mut pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
            pos.apply_move(Move::new(Square::E5, Square::D6));

            assert!(pos.piece_at(Square::D5).is_none());
            let white_pawn = pos.piece_at(Square::D6).unwrap();
            assert_eq!(Color::White, white_pawn.color);
            assert_eq!(PieceKind::Pawn, white_pawn.kind);
            assert_eq!(0, pos.halfmove_clock());
        }

        #[test]
        fn black_en_passant_capture() {
            let mut pos = Position::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1").unwrap();
            pos.apply_move(Move::new(Square::D4, Square::E3));
            assert!(pos.piece_at(Square::E4).is_none());
            assert_eq!(Color::Black, pos.piece_at(Square::E3).unwrap().color);
        }

        #[test]
        fn queenside_castle() {
            let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
            pos.apply_move(Move::new(Square::E1, Square::C1));

            let rook = pos.piece_at(Square::D1).unwrap();
            assert_eq!(Color::White, rook.color);
            assert_eq!(PieceKind::Rook, rook.kind);
            assert!(pos.piece_at(Square::A1).is_none());

            let king = pos.piece_at(Square::C1).unwrap();
            assert_eq!(PieceKind::King, king.kind);
            assert!(!pos.can_castle_queenside(Color::White));
        }

        #[test]
        fn kingside_castle() {
            let mut pos = Position::from_fen("4k2r/8/8/8/8/8/8/4K3 b k - 0 1").unwrap();
            pos.apply_move(Move::new(Square::E8, Square::G8));

            let rook = pos.piece_at(Square::F8).unwrap();
            assert_eq!(Color::Black, rook.color);
            assert_eq!(PieceKind::Rook, rook.kind);
            assert!(pos.piece_at(Square::H8).is_none());

            let king = pos.piece_at(Square::G8).unwrap();
            assert_eq!(PieceKind::King, king.kind);
            assert_eq!(2, pos.fullmove_clock());
        }
    }

    mod promotion {
        use crate::moves::Move;
        use crate::position::{Position, PromotionError};
        use crate::types::{Color, Piece, PieceKind, Square};

        #[test]
        fn basic_promotion() {
            let mut pos = Position::from_fen("k7/4P3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
            pos.apply_move(Move::new(Square::E7, Square::E8));
            assert_eq!(Some(Color::White), pos.requires_promotion(Square::E8));

            pos.promote(Square::E8, PieceKind::Queen).unwrap();
            assert_eq!(
                Some(Piece::new(PieceKind::Queen, Color::White)),
                pos.piece_at(Square::E8)
            );
            assert_eq!(None, pos.requires_promotion(Square::E8));
        }

        #[test]
        fn black_promote_capture() {
            let mut pos = Position::from_fen("4k3/8/8/8/8/8/1p6/R3K3 b Q - 0 1").unwrap();
            pos.apply_move(Move::new(Square::B2, Square::A1));
            assert_eq!(Some(Color::Black), pos.requires_promotion(Square::A1));
            pos.promote(Square::A1, PieceKind::Knight).unwrap();
            assert_eq!(
                Some(Piece::new(PieceKind::Knight, Color::Black)),
                pos.piece_at(Square::A1)
            );
            assert!(!pos.can_castle_queenside(Color::White));
        }

        #[test]
        fn pawn_not_on_last_rank() {
            let mut pos = Position::initial();
            assert_eq!(None, pos.requires_promotion(Square::E2));
            assert_eq!(
                Err(PromotionError::NotOnLastRank),
                pos.promote(Square::E2, PieceKind::Queen)
            );
        }

        #[test]
        fn no_pawn() {
            let mut pos = Position::initial();
            assert_eq!(
                Err(PromotionError::NoPawn),
                pos.promote(Square::E4, PieceKind::Queen)
            );
            assert_eq!(
                Err(PromotionError::NoPawn),
                pos.promote(Square::A8, PieceKind::Queen)
            );
        }

        #[test]
        fn invalid_kind() {
            let mut pos = Position::from_fen("k3P3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
            assert_eq!(
                Err(PromotionError::InvalidKind),
                pos.promote(Square::E8, PieceKind::King)
            );
            assert_eq!(
                Err(PromotionError::InvalidKind),
                pos.promote(Square::E8, PieceKind::Pawn)
            );
        }
    }

    mod legality {
        use crate::moves::Move;
        use crate::position::{GameStatus, Position};
        use crate::types::{Color, Square};

        #[test]
        fn wrong_side_to_move() {
            let pos = Position::initial();
            assert!(!pos.is_legal(Move::new(Square::E7, Square::E5)));
            assert!(pos.is_legal(Move::new(Square::E2, Square::E4)));
        }

        #[test]
        fn empty_source() {
            let pos = Position::initial();
            assert!(!pos.is_legal(Move::new(Square::E4, Square::E5)));
        }

        #[test]
        fn own_piece_destination() {
            let pos = Position::initial();
            assert!(!pos.is_legal(Move::new(Square::D1, Square::D2)));
            assert!(!pos.is_legal(Move::new(Square::E1, Square::E1)));
        }

        #[test]
        fn pinned_piece_cannot_leave_line() {
            // the bishop on d3 is pinned to the king by the queen on d6
            let pos = Position::from_fen("4k3/8/3q4/8/8/3B4/3K4/8 w - - 0 1").unwrap();
            let mov = Move::new(Square::D3, Square::E4);
            assert!(pos.is_pseudo_legal(Color::White, mov));
            assert!(!pos.is_legal(mov));
        }

        #[test]
        fn pinned_piece_may_move_along_pin() {
            // a5, b4, c3 and d2 share a diagonal
            let pos = Position::from_fen("4k3/8/8/q7/8/2B5/3K4/8 w - - 0 1").unwrap();
            assert!(pos.is_legal(Move::new(Square::C3, Square::B4)));
            assert!(pos.is_legal(Move::new(Square::C3, Square::A5)));
            assert!(!pos.is_legal(Move::new(Square::C3, Square::D4)));
        }

        #[test]
        fn king_cannot_step_into_check() {
            let pos = Position::from_fen("4k3/8/8/8/8/8/r7/4K3 w - - 0 1").unwrap();
            assert!(!pos.is_legal(Move::new(Square::E1, Square::E2)));
            assert!(pos.is_legal(Move::new(Square::E1, Square::F1)));
        }

        #[test]
        fn must_answer_check() {
            let pos = Position::from_fen("4k3/4r3/8/8/8/8/3P4/R3K3 w Q - 0 1").unwrap();
            assert!(pos.is_check(Color::White));
            assert!(!pos.is_legal(Move::new(Square::D2, Square::D3)));
            assert!(pos.is_legal(Move::new(Square::E1, Square::D1)));
            assert!(!pos.is_legal(Move::new(Square::E1, Square::C1)));
        }

        #[test]
        fn cannot_capture_king() {
            let pos = Position::from_fen("4k3/8/8/8/8/8/8/4RK2 w - - 0 1").unwrap();
            assert!(!pos.is_legal(Move::new(Square::E1, Square::E8)));
        }

        #[test]
        fn fools_mate() {
            let pos =
                Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                    .unwrap();
            assert!(pos.is_check(Color::White));
            assert!(!pos.has_any_legal_move(Color::White));
            assert_eq!(GameStatus::Checkmate, pos.status());
            assert!(pos.is_checkmate());
            assert!(pos.is_game_over());
        }

        #[test]
        fn stalemate_smoke() {
            let pos = Position::from_fen("7k/5K2/6Q1/8/8/8/8/8 b - - 0 1").unwrap();
            assert!(!pos.is_check(Color::Black));
            assert!(!pos.has_any_legal_move(Color::Black));
            assert!(pos.is_stalemate());
            assert!(!pos.is_checkmate());
        }

        #[test]
        fn check_with_escape() {
            let pos = Position::from_fen("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1").unwrap();
            assert_eq!(GameStatus::Check, pos.status());
            assert!(!pos.is_game_over());
        }
    }

    #[test]
    fn display_board() {
        let rendered = Position::initial().to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!("8 | r n b q k b n r |", lines[1]);
        assert_eq!("1 | R N B Q K B N R |", lines[8]);
        assert_eq!("    a b c d e f g h ", lines[10]);
    }

    #[test]
    fn scratch_copies_do_not_leak() {
        let pos = Position::from_fen("4k3/8/3q4/8/8/3B4/3K4/8 w - - 0 1").unwrap();
        let before = pos.clone();
        assert!(!pos.is_legal(Move::new(Square::D3, Square::E4)));
        assert!(pos.has_any_legal_move(Color::White));
        assert_eq!(before, pos);
    }
}
