// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rayon::prelude::*;

use crate::move_generator::{MoveGenerator, MoveVec};
use crate::position::Position;
use crate::types::PROMOTION_KINDS;

/// Counts the leaf nodes of the legal move tree rooted at `pos`, `depth`
/// plies deep. A pawn reaching its last rank counts once per promotion
/// choice, so the totals line up with the published perft tables.
pub fn perft(pos: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveVec::default();
    let movegen = MoveGenerator::new();
    movegen.generate_legal_moves(pos, &mut moves);
    moves
        .par_iter()
        .map(|&mov| {
            let new_pos = pos.with_move(mov);
            let dest = mov.destination();
            if new_pos.requires_promotion(dest).is_none() {
                return perft(&new_pos, depth - 1);
            }

            PROMOTION_KINDS
                .iter()
                .map(|&kind| {
                    let mut promoted = new_pos.clone();
                    promoted
                        .promote(dest, kind)
                        .expect("promotion of a pawn on its last rank failed");
                    perft(&promoted, depth - 1)
                })
                .sum::<u64>()
        })
        .sum()
}
