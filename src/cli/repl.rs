//! Interactive command loop.
//!
//! Reads commands line by line, keeps the current board and the stack of
//! played moves, and dispatches to the engine core. All input validation
//! happens here; the core only ever sees moves that passed the legality
//! check and positions that parsed.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use chrono::Local;

use crate::board::board::Board;
use crate::board::chess_move::Move;
use crate::board::piece::Color;
use crate::movegen::attacks::is_attacked;
use crate::movegen::generator::legal_moves;
use crate::movegen::make_move::{make, undo};
use crate::movegen::perft::{perft_divide_parallel, perft_parallel};
use crate::search::evaluate::evaluate;
use crate::search::pick_move::{best_move, SearchOutcome};

const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";

/// Run the loop on stdin/stdout until `q` or end of input.
pub fn run_stdio_loop() -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(stdin.lock(), stdout.lock())
}

/// Run the loop on arbitrary reader/writer pairs (tests drive this with
/// in-memory buffers).
pub fn run<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<()> {
    let mut session = Session::new();

    writeln!(output, "Damson Chess")?;
    writeln!(output, "Type '?' for a list of commands")?;

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let command = line.trim();
        if command == "q" {
            writeln!(output, "quitting...")?;
            break;
        }
        session.dispatch(command, &mut input, &mut output)?;
        output.flush()?;
    }
    Ok(())
}

struct Session {
    board: Board,
    played: Vec<Move>,
}

impl Session {
    fn new() -> Self {
        Self {
            board: Board::new_game(),
            played: Vec::new(),
        }
    }

    fn dispatch<R: BufRead, W: Write>(
        &mut self,
        command: &str,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<()> {
        let Some(head) = command.split_whitespace().next() else {
            return Ok(());
        };
        let rest = command[head.len()..].trim();

        match head {
            "?" => print_help(output),
            "s" => self.set_board(rest, output),
            "i" => {
                self.reset(Board::new_game());
                writeln!(output, "setting up initial position...")?;
                writeln!(output, "{}", self.board.render())
            }
            "k" => {
                writeln!(output, "setting up Kiwipete position...")?;
                self.set_board(KIWIPETE_FEN, output)
            }
            "b" => writeln!(output, "{}", self.board.render()),
            "e" => writeln!(output, "evaluation: {}", evaluate(&self.board)),
            "p" => self.run_perft(rest, output),
            "d" => self.run_divide(rest, output),
            "l" => self.list_legal_moves(output),
            "m" => self.play_move(rest, output),
            "u" => self.undo_move(output),
            "c" => self.calculate(output),
            "g" => self.game_vs_engine(input, output),
            "ccg" => self.engine_vs_engine(output),
            _ => writeln!(output, "unknown command; type '?' for a list of commands"),
        }
    }

    fn reset(&mut self, board: Board) {
        self.board = board;
        self.played.clear();
    }

    fn set_board<W: Write>(&mut self, fen: &str, output: &mut W) -> io::Result<()> {
        match Board::from_fen(fen) {
            Ok(board) => {
                self.reset(board);
                writeln!(output, "{}", self.board.render())
            }
            Err(reason) => writeln!(output, "could not set board: {reason}"),
        }
    }

    fn run_perft<W: Write>(&mut self, arg: &str, output: &mut W) -> io::Result<()> {
        let Some(depth) = parse_depth(arg) else {
            return writeln!(output, "usage: p <depth>");
        };
        let started = Instant::now();
        let nodes = perft_parallel(&mut self.board, depth);
        writeln!(
            output,
            "[{}] computed {} possible positions (depth {}) in {:.3} seconds",
            Local::now().format("%H:%M:%S"),
            nodes,
            depth,
            started.elapsed().as_secs_f64()
        )
    }

    fn run_divide<W: Write>(&mut self, arg: &str, output: &mut W) -> io::Result<()> {
        let Some(depth) = parse_depth(arg) else {
            return writeln!(output, "usage: d <depth>");
        };
        let started = Instant::now();
        let split = perft_divide_parallel(&mut self.board, depth);
        let mut total = 0;
        for (mv, nodes) in &split {
            writeln!(output, "{}\t{}", mv.to_text(), nodes)?;
            total += nodes;
        }
        writeln!(
            output,
            "[{}] computed {} possible positions (depth {}) in {:.3} seconds",
            Local::now().format("%H:%M:%S"),
            total,
            depth,
            started.elapsed().as_secs_f64()
        )
    }

    fn list_legal_moves<W: Write>(&mut self, output: &mut W) -> io::Result<()> {
        let legal = legal_moves(&mut self.board);
        let listed: Vec<String> = legal.iter().map(Move::to_text).collect();
        writeln!(output, "legal moves: {}", listed.join(" "))
    }

    fn play_move<W: Write>(&mut self, text: &str, output: &mut W) -> io::Result<()> {
        let mv = match Move::from_text(text) {
            Ok(mv) => mv,
            Err(reason) => return writeln!(output, "{reason}"),
        };
        if !legal_moves(&mut self.board).contains(&mv) {
            return writeln!(output, "move {} is not possible", mv.to_text());
        }

        let mut mv = mv;
        writeln!(output, "making move: {}", mv.to_text())?;
        make(&mut self.board, &mut mv);
        self.played.push(mv);
        writeln!(output, "{}", self.board.render())
    }

    fn undo_move<W: Write>(&mut self, output: &mut W) -> io::Result<()> {
        match self.played.pop() {
            Some(mv) => {
                writeln!(output, "undo move: {}", mv.to_text())?;
                undo(&mut self.board, &mv);
                writeln!(output, "{}", self.board.render())
            }
            None => writeln!(output, "no move played yet"),
        }
    }

    fn calculate<W: Write>(&mut self, output: &mut W) -> io::Result<()> {
        writeln!(output, "calculating best move...")?;
        match best_move(&mut self.board) {
            Some(outcome) => report_outcome(&outcome, output),
            None => writeln!(output, "no legal moves in this position"),
        }
    }

    fn game_vs_engine<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<()> {
        writeln!(output, "starting game vs engine...")?;
        writeln!(output, "type 'm <move>' to play, 'q' to quit the game")?;
        writeln!(output, "{}", self.board.render())?;

        let mut line = String::new();
        loop {
            if legal_moves(&mut self.board).is_empty() {
                return self.print_verdict(output);
            }

            // Human half-move.
            let human = loop {
                line.clear();
                if input.read_line(&mut line)? == 0 {
                    writeln!(output, "quitting game...")?;
                    return Ok(());
                }
                let entered = line.trim();
                if entered == "q" {
                    writeln!(output, "quitting game...")?;
                    return Ok(());
                }
                if let Some(text) = entered.strip_prefix("m ") {
                    if let Ok(mv) = Move::from_text(text.trim()) {
                        if legal_moves(&mut self.board).contains(&mv) {
                            break mv;
                        }
                    }
                }
                writeln!(output, "invalid input; type 'm <your move>'")?;
            };
            let mut human = human;
            writeln!(output, "making move: {}", human.to_text())?;
            make(&mut self.board, &mut human);
            self.played.push(human);
            writeln!(output, "{}", self.board.render())?;

            if legal_moves(&mut self.board).is_empty() {
                return self.print_verdict(output);
            }

            // Engine half-move.
            let Some(outcome) = best_move(&mut self.board) else {
                return self.print_verdict(output);
            };
            report_outcome(&outcome, output)?;
            let mut reply = outcome.best_move;
            make(&mut self.board, &mut reply);
            self.played.push(reply);
            writeln!(output, "{}", self.board.render())?;
        }
    }

    fn engine_vs_engine<W: Write>(&mut self, output: &mut W) -> io::Result<()> {
        writeln!(output, "starting game engine vs engine...")?;
        writeln!(output, "{}", self.board.render())?;

        while let Some(outcome) = best_move(&mut self.board) {
            report_outcome(&outcome, output)?;
            let mut mv = outcome.best_move;
            make(&mut self.board, &mut mv);
            self.played.push(mv);
            writeln!(output, "{}", self.board.render())?;
        }
        self.print_verdict(output)
    }

    /// Game-over report: the side to move has no legal moves; whether its
    /// king is attacked decides checkmate versus stalemate.
    fn print_verdict<W: Write>(&mut self, output: &mut W) -> io::Result<()> {
        let stuck = self.board.turn;
        let in_check = is_attacked(
            &self.board,
            self.board.king_square(stuck),
            stuck.opposite(),
        );
        if in_check {
            match stuck {
                Color::White => writeln!(output, "Black won!"),
                Color::Black => writeln!(output, "White won!"),
            }
        } else {
            writeln!(output, "Stalemate!")
        }
    }
}

fn parse_depth(arg: &str) -> Option<u32> {
    arg.split_whitespace().next()?.parse().ok()
}

fn report_outcome<W: Write>(outcome: &SearchOutcome, output: &mut W) -> io::Result<()> {
    writeln!(
        output,
        "[{}] computed best move: {} (depth {}, value {}) in {:.3} seconds",
        Local::now().format("%H:%M:%S"),
        outcome.best_move.to_text(),
        outcome.depth,
        outcome.value,
        outcome.elapsed.as_secs_f64()
    )
}

fn print_help<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "Commands:")?;
    writeln!(output, "  s <fen>      set position to <fen>")?;
    writeln!(output, "  i            set up the initial position")?;
    writeln!(output, "  k            set up the Kiwipete position")?;
    writeln!(output, "  b            view the current board")?;
    writeln!(output, "  e            view the evaluation of the position")?;
    writeln!(output, "  p <depth>    count positions reachable at <depth>")?;
    writeln!(output, "  d <depth>    per-move breakdown of the perft count")?;
    writeln!(output, "  l            list the legal moves")?;
    writeln!(output, "  m <move>     play the move <move>")?;
    writeln!(output, "  u            undo the last played move")?;
    writeln!(output, "  c            calculate the best move")?;
    writeln!(output, "  g            play a game against the engine")?;
    writeln!(output, "  ccg          watch the engine play itself")?;
    writeln!(output, "  q            quit")
}

#[cfg(test)]
mod tests {
    use super::run;
    use std::io::Cursor;

    fn drive(script: &str) -> String {
        let mut output = Vec::new();
        run(Cursor::new(script.as_bytes().to_vec()), &mut output)
            .expect("the command loop should not fail on in-memory buffers");
        String::from_utf8(output).expect("output should be valid UTF-8")
    }

    #[test]
    fn lists_legal_moves_of_the_starting_position() {
        let output = drive("i\nl\nq\n");
        assert!(output.contains("legal moves:"));
        assert!(output.contains("e2e4"));
        assert!(output.contains("g1f3"));
    }

    #[test]
    fn plays_and_undoes_a_move() {
        let output = drive("m e2e4\nu\nq\n");
        assert!(output.contains("making move: e2e4"));
        assert!(output.contains("undo move: e2e4"));
    }

    #[test]
    fn rejects_illegal_and_malformed_moves() {
        let output = drive("m e2e5\nm nonsense\nu\nq\n");
        assert!(output.contains("move e2e5 is not possible"));
        assert!(output.contains("invalid move text"));
        assert!(output.contains("no move played yet"));
    }

    #[test]
    fn perft_command_reports_the_reference_count() {
        let output = drive("p 2\nq\n");
        assert!(output.contains("computed 400 possible positions (depth 2)"));
    }

    #[test]
    fn divide_command_splits_by_root_move() {
        let output = drive("d 1\nq\n");
        assert!(output.contains("e2e4\t1"));
        assert!(output.contains("computed 20 possible positions (depth 1)"));
    }

    #[test]
    fn set_board_rejects_bad_snapshots() {
        let output = drive("s not a fen\nq\n");
        assert!(output.contains("could not set board"));
    }

    #[test]
    fn unknown_commands_point_at_help() {
        let output = drive("xyzzy\nq\n");
        assert!(output.contains("unknown command"));
    }
}
