use pathfinding::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::PuzzleSeed;

/// Cells per side of the maze puzzle.
pub const MAZE_SIZE: usize = 24;

pub type Cell = (usize, usize);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dir {
    North,
    East,
    South,
    West,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::North, Dir::East, Dir::South, Dir::West];

    fn opposite(self) -> Dir {
        match self {
            Dir::North => Dir::South,
            Dir::East => Dir::West,
            Dir::South => Dir::North,
            Dir::West => Dir::East,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Dir::North => 0b0001,
            Dir::East => 0b0010,
            Dir::South => 0b0100,
            Dir::West => 0b1000,
        }
    }
}

/// A perfect maze: outer walls closed, exactly one path between any two cells.
/// Row 0 is the top; north is toward row 0.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Maze {
    width: usize,
    height: usize,
    /// Bitmask of walls still standing, per cell
    walls: Vec<u8>,
}

impl Maze {
    /// Carve with a randomized depth-first search. The same seed always
    /// gives the same layout.
    pub fn generate(width: usize, height: usize, seed: u64) -> Self {
        let mut maze = Self { width, height, walls: vec![0b1111; width * height] };
        if width == 0 || height == 0 {
            return maze;
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut visited = vec![false; width * height];
        let mut stack = vec![(0, 0)];
        visited[0] = true;

        while let Some(&cell) = stack.last() {
            let unvisited: Vec<(Dir, Cell)> = Dir::ALL
                .into_iter()
                .filter_map(|dir| maze.step(cell, dir).map(|next| (dir, next)))
                .filter(|&(_, next)| !visited[maze.index(next)])
                .collect();
            if unvisited.is_empty() {
                stack.pop();
                continue;
            }

            let (dir, next) = unvisited[rng.random_range(0..unvisited.len())];
            maze.carve(cell, dir, next);
            visited[maze.index(next)] = true;
            stack.push(next);
        }
        maze
    }

    /// The maze for the day after `seed` rewinds.
    pub fn for_day(seed: &impl PuzzleSeed) -> Self {
        Self::generate(MAZE_SIZE, MAZE_SIZE, maze_seed(seed))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn has_wall(&self, cell: Cell, dir: Dir) -> bool {
        self.walls[self.index(cell)] & dir.bit() != 0
    }

    /// Cells reachable in one move from `cell`.
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        Dir::ALL
            .into_iter()
            .filter(|&dir| !self.has_wall(cell, dir))
            .filter_map(|dir| self.step(cell, dir))
            .collect()
    }

    /// Shortest route from `from` to `to`, both ends included.
    pub fn solve(&self, from: Cell, to: Cell) -> Option<Vec<Cell>> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        bfs(&from, |&cell| self.neighbors(cell), |&cell| cell == to)
    }

    /// Route from the top-left entrance to the bottom-right exit.
    pub fn solution(&self) -> Option<Vec<Cell>> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        self.solve((0, 0), (self.width - 1, self.height - 1))
    }

    fn contains(&self, (x, y): Cell) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, (x, y): Cell) -> usize {
        y * self.width + x
    }

    fn step(&self, (x, y): Cell, dir: Dir) -> Option<Cell> {
        let next = match dir {
            Dir::North => (x, y.checked_sub(1)?),
            Dir::East => (x + 1, y),
            Dir::South => (x, y + 1),
            Dir::West => (x.checked_sub(1)?, y),
        };
        self.contains(next).then_some(next)
    }

    fn carve(&mut self, cell: Cell, dir: Dir, next: Cell) {
        let (here, there) = (self.index(cell), self.index(next));
        self.walls[here] &= !dir.bit();
        self.walls[there] &= !dir.opposite().bit();
    }
}

/// Seed for the maze generator; stable for a given rewind count.
pub fn maze_seed(seed: &impl PuzzleSeed) -> u64 {
    // spread small counts across the seed space
    u64::from(seed.rewind_count()).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
