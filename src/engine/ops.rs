use rand::Rng;

use super::state::{Board, Move, Row, Score, Tile, SIZE};

/// Slide/merge tiles in the given direction, returning the new board and the
/// points gained from merges. No randomness.
///
/// Every direction is reduced to a left move: the board is reoriented, each
/// row is merged independently, then the reorientation is undone.
pub fn shift(board: Board, direction: Move) -> (Board, Score) {
    let oriented = orient(board, direction);
    let mut gained = 0;
    let mut rows = oriented.0;
    for row in rows.iter_mut() {
        let (merged, points) = merge_row(*row);
        *row = merged;
        gained += points;
    }
    (restore(Board(rows), direction), gained)
}

/// Compact and merge a single row toward index 0.
///
/// One left-to-right pass: each tile merges at most once, so `[2, 2, 2, 2]`
/// becomes `[4, 4, 0, 0]` rather than `[8, 0, 0, 0]`. A pair whose sum would
/// not fit in a `Tile` stays unmerged.
pub fn merge_row(row: Row) -> (Row, Score) {
    let mut tiles: Vec<Tile> = row.into_iter().filter(|&v| v != 0).collect();
    let mut gained: Score = 0;
    for i in 1..tiles.len() {
        if tiles[i] == 0 || tiles[i] != tiles[i - 1] {
            continue;
        }
        if let Some(doubled) = tiles[i - 1].checked_mul(2) {
            tiles[i - 1] = doubled;
            gained += Score::from(doubled);
            tiles[i] = 0;
        }
    }
    let mut out = [0; SIZE];
    for (dst, v) in out.iter_mut().zip(tiles.into_iter().filter(|&v| v != 0)) {
        *dst = v;
    }
    (out, gained)
}

fn orient(board: Board, direction: Move) -> Board {
    match direction {
        Move::Left => board,
        Move::Right => reverse_rows(board),
        Move::Up => transpose(board),
        Move::Down => transpose(flip(board)),
    }
}

// Exact inverse of `orient`.
fn restore(board: Board, direction: Move) -> Board {
    match direction {
        Move::Left => board,
        Move::Right => reverse_rows(board),
        Move::Up => transpose(board),
        Move::Down => flip(transpose(board)),
    }
}

pub fn transpose(board: Board) -> Board {
    let mut out = [[0; SIZE]; SIZE];
    for (r, row) in board.0.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            out[c][r] = v;
        }
    }
    Board(out)
}

/// Mirror each row left to right.
pub fn reverse_rows(board: Board) -> Board {
    let mut rows = board.0;
    for row in rows.iter_mut() {
        row.reverse();
    }
    Board(rows)
}

/// Mirror the row order top to bottom.
pub fn flip(board: Board) -> Board {
    let mut rows = board.0;
    rows.reverse();
    Board(rows)
}

/// True if any cell is empty or any cell equals its right or lower neighbour.
pub fn can_move(board: Board) -> bool {
    let cells = &board.0;
    for r in 0..SIZE {
        for c in 0..SIZE {
            let v = cells[r][c];
            if v == 0 {
                return true;
            }
            if c + 1 < SIZE && cells[r][c + 1] == v {
                return true;
            }
            if r + 1 < SIZE && cells[r + 1][c] == v {
                return true;
            }
        }
    }
    false
}

/// Count the number of zero tiles.
pub fn count_empty(board: Board) -> usize {
    board.tiles().filter(|&v| v == 0).count()
}

/// Insert a random 2 or 4 into a uniformly chosen empty cell. Full boards are returned as-is.
pub fn insert_random_tile<R: Rng + ?Sized>(board: Board, rng: &mut R) -> Board {
    let empty: Vec<(usize, usize)> = (0..SIZE)
        .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
        .filter(|&(r, c)| board.0[r][c] == 0)
        .collect();
    if empty.is_empty() {
        return board;
    }
    let (r, c) = empty[rng.gen_range(0..empty.len())];
    let mut rows = board.0;
    rows[r][c] = generate_random_tile(rng);
    Board(rows)
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_bool(0.5) { 2 } else { 4 }
}

pub fn get_highest_tile_val(board: Board) -> Tile {
    board.tiles().max().unwrap_or(0)
}

pub(crate) fn format_val(val: Tile) -> String {
    match val {
        0 => String::from("       "),
        x => format!("{:^7}", x),
    }
}
