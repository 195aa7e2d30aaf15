// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

use std::convert::TryFrom;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::process;
use std::time::Instant;

use arbiter::attacks;
use arbiter::{perft, File, GameStatus, Move, MoveGenerator, MoveVec, PieceKind, Position, Rank, Square};
use clap::{App, Arg, ArgMatches, SubCommand};

#[derive(Serialize)]
struct MovesReport {
    fen: String,
    side_to_move: String,
    status: String,
    checkers: Vec<String>,
    moves: Vec<String>,
}

#[derive(Serialize)]
struct PerftRecord {
    depth: u32,
    nodes: u64,
    millis: u64,
}

#[derive(Serialize)]
struct PerftReport {
    fen: String,
    results: Vec<PerftRecord>,
}

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .subcommand(
            SubCommand::with_name("play")
                .about("Two players alternate moves at the console")
                .arg(
                    Arg::with_name("fen")
                        .help("Start from this FEN instead of the initial position")
                        .value_name("FEN")
                        .long("--fen")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("moves")
                .about("List the legal moves in a board position")
                .arg(
                    Arg::with_name("FEN")
                        .help("FEN string for a board position")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("json")
                        .help("Print the report as JSON")
                        .long("--json"),
                ),
        )
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(
                    Arg::with_name("FEN")
                        .help("FEN string for a board position")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("depth")
                        .help("Depth of move tree to search")
                        .value_name("DEPTH")
                        .short("-d")
                        .long("--depth")
                        .default_value("3")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("json")
                        .help("Print the results as JSON")
                        .long("--json"),
                ),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("moves") {
        run_moves(matches);
    }

    if let Some(matches) = matches.subcommand_matches("perft") {
        run_perft(matches);
    }

    let fen = matches
        .subcommand_matches("play")
        .and_then(|play| play.value_of("fen"));
    let pos = load_position(fen);
    if let Err(err) = play(pos) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn load_position(fen: Option<&str>) -> Position {
    match fen {
        Some(fen) => match Position::from_fen(fen) {
            Ok(pos) => pos,
            Err(err) => {
                eprintln!("invalid fen: {}", err);
                process::exit(1);
            }
        },
        None => Position::initial(),
    }
}

fn run_moves(matches: &ArgMatches) -> ! {
    let pos = load_position(matches.value_of("FEN"));
    let side = pos.side_to_move();
    let checkers: Vec<String> = match pos.board().king(side) {
        Some(king) => attacks::attackers(pos.board(), king, side.toggle())
            .map(|sq| sq.to_string())
            .collect(),
        None => {
            eprintln!("invalid position: no {} king", side);
            process::exit(1);
        }
    };

    let mut moves = MoveVec::default();
    MoveGenerator::new().generate_legal_moves(&pos, &mut moves);
    let report = MovesReport {
        fen: pos.as_fen(),
        side_to_move: side.to_string(),
        status: pos.status().to_string(),
        checkers,
        moves: moves.iter().map(|mov| mov.to_string()).collect(),
    };

    if matches.is_present("json") {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("failed to serialize report: {}", err);
                process::exit(1);
            }
        }
    } else {
        println!("{}", pos);
        println!("fen:      {}", report.fen);
        println!("to move:  {}", report.side_to_move);
        println!("status:   {}", report.status);
        if !report.checkers.is_empty() {
            println!("checkers: {}", report.checkers.join(" "));
        }

        println!("moves ({}): {}", report.moves.len(), report.moves.join(" "));
    }

    process::exit(0);
}

fn run_perft(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("FEN").unwrap();
    let depth = value_t_or_exit!(matches, "depth", u32);
    let json = matches.is_present("json");
    let pos = load_position(Some(fen));
    if pos.board().king(pos.side_to_move()).is_none() {
        eprintln!("invalid position: no {} king", pos.side_to_move());
        process::exit(1);
    }

    if !json {
        println!("fen:   {}", fen);
        println!("depth: {}", depth);
        println!();
        println!("{}", pos);
        println!();
    }

    let mut results = vec![];
    for i in 1..depth + 1 {
        let start = Instant::now();
        let nodes = perft(&pos, i);
        let duration = start.elapsed();
        let millis = duration.as_secs() * 1000 + u64::from(duration.subsec_millis());
        if !json {
            println!("perft({}) = {} ({} ms)", i, nodes, millis);
        }

        results.push(PerftRecord {
            depth: i,
            nodes,
            millis,
        });
    }

    if json {
        let report = PerftReport {
            fen: fen.to_owned(),
            results,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("failed to serialize report: {}", err);
                process::exit(1);
            }
        }
    }

    process::exit(0);
}

/// Reads moves in coordinate notation ("e2e4") until the game ends, the
/// input runs out, or someone types "exit".
fn play(mut pos: Position) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("{}", pos);
        let side = pos.side_to_move();
        match pos.status() {
            GameStatus::Checkmate => {
                println!("Checkmate! {} wins.", side.toggle());
                return Ok(());
            }
            GameStatus::Stalemate => {
                println!("Stalemate! The game is a draw.");
                return Ok(());
            }
            GameStatus::Check => println!("{} is in check!", side),
            GameStatus::Ongoing => {}
        }

        print!("{} to move (e.g. e2e4, or \"exit\"): ", side);
        io::stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };

        let input = line.trim();
        if input == "exit" {
            return Ok(());
        }

        let mov = match parse_move(input) {
            Some(mov) => mov,
            None => {
                println!("Invalid input. Enter a move such as e2e4.");
                continue;
            }
        };

        if !pos.is_legal(mov) {
            if pos.is_pseudo_legal(side, mov) {
                println!("Illegal move: {} would leave your king in check.", mov);
            } else {
                println!("Illegal move: {}.", mov);
            }

            continue;
        }

        pos.apply_move(mov);
        info!("{} played {}", side, mov);
        if pos.requires_promotion(mov.destination()).is_some() {
            let kind = read_promotion(&mut lines)?;
            pos.promote(mov.destination(), kind)?;
            info!("{} promoted on {} to {}", side, mov.destination(), kind);
        }
    }
}

/// Asks which piece a pawn becomes. Anything that isn't a promotion letter
/// picks a queen.
fn read_promotion<I>(lines: &mut I) -> io::Result<PieceKind>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("Promote to (q, r, b, n): ");
    io::stdout().flush()?;
    let line = match lines.next() {
        Some(line) => line?,
        None => return Ok(PieceKind::Queen),
    };

    let kind = line
        .trim()
        .chars()
        .next()
        .and_then(|c| PieceKind::try_from(c).ok())
        .filter(|kind| kind.is_promotion_target())
        .unwrap_or(PieceKind::Queen);
    Ok(kind)
}

fn parse_move(input: &str) -> Option<Move> {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() != 4 {
        return None;
    }

    let square = |file: char, rank: char| -> Option<Square> {
        let file = File::try_from(file.to_ascii_lowercase()).ok()?;
        let rank = Rank::try_from(rank).ok()?;
        Some(Square::of(rank, file))
    };

    Some(Move::new(
        square(chars[0], chars[1])?,
        square(chars[2], chars[3])?,
    ))
}
