use anyhow::{Context, Result, bail};
use smallvec::SmallVec;
use std::fmt;

/// Largest supported board dimension. Tiles are stored as `u8`, so the
/// highest tile value n²−1 must fit in a byte.
pub const MAX_DIMENSION: usize = 16;

/// An immutable n×n arrangement of tiles, with 0 denoting the blank cell.
///
/// All derived arrangements ([`twin`](Self::twin), [`neighbors`](Self::neighbors))
/// are returned as new values; a `Board` is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    n: usize,
    tiles: Vec<u8>,
    blank: usize,
}

impl Board {
    /// Constructs a board from an n×n grid of tile values in row-major order.
    pub fn from_grid(rows: Vec<Vec<u8>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            bail!("Board grid is empty.");
        }
        if n > MAX_DIMENSION {
            bail!("Board dimension {n} exceeds the supported maximum {MAX_DIMENSION}.");
        }
        let mut tiles = Vec::with_capacity(n * n);
        for row in &rows {
            if row.len() != n {
                bail!(
                    "Board grid is not square: expected {n} columns, found {}.",
                    row.len()
                );
            }
            tiles.extend_from_slice(row);
        }
        Self::from_tiles(n, tiles)
    }

    /// Parses the plain-text grid format: the dimension n on the first line,
    /// followed by n rows of n whitespace-separated tile values.
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());
        let first = lines.next().context("Board input is empty")?;
        let n: usize = first
            .parse()
            .with_context(|| format!("Invalid board dimension '{first}'"))?;
        if n == 0 || n > MAX_DIMENSION {
            bail!("Unsupported board dimension {n}.");
        }

        let mut tiles = Vec::with_capacity(n * n);
        for line in lines {
            for token in line.split_whitespace() {
                let value: u8 = token
                    .parse()
                    .with_context(|| format!("Invalid tile value '{token}'"))?;
                tiles.push(value);
            }
        }
        if tiles.len() != n * n {
            bail!(
                "Expected {} tiles for a {n}x{n} board, found {}.",
                n * n,
                tiles.len()
            );
        }
        Self::from_tiles(n, tiles)
    }

    /// The solved board for dimension `n`: tiles 1..n²−1 in row-major order,
    /// blank in the last cell.
    pub fn goal(n: usize) -> Result<Self> {
        if n == 0 || n > MAX_DIMENSION {
            bail!("Unsupported board dimension {n}.");
        }
        let total = n * n;
        let tiles = (0..total)
            .map(|i| if i == total - 1 { 0 } else { (i + 1) as u8 })
            .collect();
        Ok(Self {
            n,
            tiles,
            blank: total - 1,
        })
    }

    fn from_tiles(n: usize, tiles: Vec<u8>) -> Result<Self> {
        let blank = tiles
            .iter()
            .position(|&t| t == 0)
            .context("Board has no blank cell")?;
        Ok(Self { n, tiles, blank })
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn tile(&self, row: usize, col: usize) -> u8 {
        self.tiles[row * self.n + col]
    }

    // The value the goal board holds at a flat index.
    #[inline]
    fn goal_value(&self, index: usize) -> u8 {
        if index == self.n * self.n - 1 {
            0
        } else {
            (index + 1) as u8
        }
    }

    /// Whether the tiles form a permutation of 0..n²−1.
    pub fn is_valid(&self) -> bool {
        let total = self.n * self.n;
        let mut seen = vec![false; total];
        for &tile in &self.tiles {
            let tile = tile as usize;
            if tile >= total || seen[tile] {
                return false;
            }
            seen[tile] = true;
        }
        true
    }

    /// Number of tiles out of place, not counting the blank.
    pub fn hamming(&self) -> u32 {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(i, &t)| t != 0 && t != self.goal_value(i))
            .count() as u32
    }

    /// Sum over all tiles of the grid distance to each tile's goal position.
    /// Never overestimates the number of moves left, and cannot drop by more
    /// than 1 per move.
    pub fn manhattan(&self) -> u32 {
        let n = self.n;
        let mut total = 0;
        for (i, &tile) in self.tiles.iter().enumerate() {
            if tile == 0 {
                continue;
            }
            let goal = tile as usize - 1;
            total += (i / n).abs_diff(goal / n) + (i % n).abs_diff(goal % n);
        }
        total as u32
    }

    pub fn is_goal(&self) -> bool {
        self.tiles
            .iter()
            .enumerate()
            .all(|(i, &t)| t == self.goal_value(i))
    }

    /// The board obtained by swapping the first two non-blank tiles in
    /// row-major order. Swapping any two non-blank tiles flips solvability,
    /// so exactly one of a board and its twin can reach the goal.
    pub fn twin(&self) -> Self {
        let mut tiles = self.tiles.clone();
        let mut first = None;
        for (i, &tile) in self.tiles.iter().enumerate() {
            if tile == 0 {
                continue;
            }
            match first {
                None => first = Some(i),
                Some(found) => {
                    tiles.swap(found, i);
                    break;
                }
            }
        }
        Self {
            n: self.n,
            tiles,
            blank: self.blank,
        }
    }

    /// The boards reachable by sliding one adjacent tile into the blank cell.
    /// Between 2 and 4 boards for n ≥ 2; order is unspecified.
    pub fn neighbors(&self) -> SmallVec<[Board; 4]> {
        let n = self.n;
        let (row, col) = (self.blank / n, self.blank % n);
        let mut boards = SmallVec::new();
        if row + 1 < n {
            boards.push(self.slide(self.blank + n));
        }
        if row > 0 {
            boards.push(self.slide(self.blank - n));
        }
        if col + 1 < n {
            boards.push(self.slide(self.blank + 1));
        }
        if col > 0 {
            boards.push(self.slide(self.blank - 1));
        }
        boards
    }

    // Move the tile at `from` into the blank cell, producing a new board.
    fn slide(&self, from: usize) -> Board {
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, from);
        Board {
            n: self.n,
            tiles,
            blank: from,
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.n)?;
        for row in self.tiles.chunks(self.n) {
            for (i, tile) in row.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{tile:2}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD_3X3: &str = "3
1 2 3
0 7 6
5 4 8";

    #[test]
    fn test_parse_board() {
        let board = Board::parse(BOARD_3X3).unwrap();
        assert_eq!(board.dimension(), 3);
        assert_eq!(board.tile(0, 0), 1);
        assert_eq!(board.tile(1, 0), 0);
        assert_eq!(board.tile(2, 2), 8);
        assert!(board.is_valid());
    }

    #[test]
    fn test_display_round_trip() {
        let board = Board::parse(BOARD_3X3).unwrap();
        let reparsed = Board::parse(&board.to_string()).unwrap();
        assert_eq!(board, reparsed);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(Board::parse("").is_err());
        assert!(Board::parse("x").is_err());
        assert!(Board::parse("2\n1 2\n3").is_err());
        assert!(Board::parse("2\n1 2\n3 x").is_err());
        assert!(Board::parse("2\n1 2\n3 4 0").is_err());
    }

    #[test]
    fn test_from_grid_rejects_bad_shapes() {
        assert!(Board::from_grid(vec![]).is_err());
        assert!(Board::from_grid(vec![vec![1, 2], vec![0]]).is_err());
        // no blank cell
        assert!(Board::from_grid(vec![vec![1, 2], vec![3, 4]]).is_err());
    }

    #[test]
    fn test_is_valid_rejects_duplicates() {
        let board = Board::from_grid(vec![vec![1, 1], vec![0, 2]]).unwrap();
        assert!(!board.is_valid());
        let board = Board::from_grid(vec![vec![9, 2], vec![0, 3]]).unwrap();
        assert!(!board.is_valid());
    }

    #[test]
    fn test_hamming_and_manhattan() {
        let board = Board::parse(BOARD_3X3).unwrap();
        assert_eq!(board.hamming(), 4);
        assert_eq!(board.manhattan(), 7);

        let board = Board::parse("3\n5 1 8\n2 7 3\n4 0 6").unwrap();
        assert_eq!(board.hamming(), 8);
        assert_eq!(board.manhattan(), 13);
    }

    #[test]
    fn test_goal_board() {
        for n in [2, 3, 4] {
            let goal = Board::goal(n).unwrap();
            assert!(goal.is_goal());
            assert_eq!(goal.hamming(), 0);
            assert_eq!(goal.manhattan(), 0);
            // every one-move departure from the goal has nonzero distance
            for neighbor in goal.neighbors() {
                assert!(!neighbor.is_goal());
                assert!(neighbor.hamming() > 0);
                assert!(neighbor.manhattan() > 0);
            }
        }
    }

    #[test]
    fn test_twin_swaps_first_two_tiles() {
        let board = Board::parse("2\n1 2\n0 3").unwrap();
        let twin = board.twin();
        assert_eq!(twin, Board::parse("2\n2 1\n0 3").unwrap());
        // the scan order is fixed, so twinning twice restores this board
        assert_eq!(twin.twin(), board);
        assert_ne!(twin, board);
    }

    #[test]
    fn test_twin_never_touches_the_blank() {
        let board = Board::parse(BOARD_3X3).unwrap();
        let twin = board.twin();
        assert_eq!(twin.tile(1, 0), 0);
        assert_eq!(twin, Board::parse("3\n2 1 3\n0 7 6\n5 4 8").unwrap());
    }

    #[test]
    fn test_neighbor_count() {
        // blank in a corner, on an edge, and in the center
        let corner = Board::parse("3\n1 2 3\n4 5 6\n7 8 0").unwrap();
        assert_eq!(corner.neighbors().len(), 2);
        let edge = Board::parse("3\n1 2 3\n0 5 6\n7 8 4").unwrap();
        assert_eq!(edge.neighbors().len(), 3);
        let center = Board::parse("3\n1 2 3\n4 0 6\n7 8 5").unwrap();
        assert_eq!(center.neighbors().len(), 4);
    }

    #[test]
    fn test_neighbors_are_reversible() {
        let board = Board::parse(BOARD_3X3).unwrap();
        for neighbor in board.neighbors() {
            assert_ne!(neighbor, board);
            // each neighbor differs by exactly one tile-blank swap
            let differing = (0..3)
                .flat_map(|r| (0..3).map(move |c| (r, c)))
                .filter(|&(r, c)| neighbor.tile(r, c) != board.tile(r, c))
                .count();
            assert_eq!(differing, 2);
            // sliding back is always among the neighbor's own moves
            assert!(neighbor.neighbors().contains(&board));
        }
    }
}
