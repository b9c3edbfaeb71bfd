//! Maze generation: recursive backtracker followed by a braid pass
//!
//! Algorithm:
//! 1. Every cell starts with all four walls
//! 2. Carve (DFS with an explicit stack, starting at (0, 0)):
//!    - Peek the top of the stack and collect its unvisited neighbours
//!    - If neighbours exist:
//!      * Choose one at random
//!      * Remove the wall between current cell and neighbour (both sides)
//!      * Mark the neighbour visited and push it
//!    - Else: backtrack (pop)
//! 3. Braid: each cell, with probability BRAID_PERCENT, loses one more of
//!    its standing interior walls, chosen at random. Boundary walls stay.
//!
//! The carve yields a spanning tree over all cells, so every cell is
//! reachable from the start. Braiding only opens passages, so it keeps that
//! property while adding loops.

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::rng::{MazeRng, SimpleLCG};
use crate::{BRAID_PERCENT, MAX_CELLS};

/// A move or wall side. Wall arrays are indexed in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions, in neighbour scanning order
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// Column / row step of one move
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl core::str::FromStr for Direction {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "right" => Ok(Direction::Right),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            _ => Err(MazeError::UnknownDirection),
        }
    }
}

/// Cell coordinates, `x` the column and `y` the row
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A cell in the maze with walls in four directions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    walls: [bool; 4], // [Up, Right, Down, Left]
}

impl Cell {
    fn new() -> Self {
        Self { walls: [true; 4] }
    }

    /// Whether a wall stands on the given side
    pub fn wall(&self, side: Direction) -> bool {
        self.walls[side.index()]
    }

    pub fn top(&self) -> bool {
        self.wall(Direction::Up)
    }

    pub fn right(&self) -> bool {
        self.wall(Direction::Right)
    }

    pub fn bottom(&self) -> bool {
        self.wall(Direction::Down)
    }

    pub fn left(&self) -> bool {
        self.wall(Direction::Left)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MazeError {
    /// Width or height is zero
    EmptyDimensions,
    /// `width * height` exceeds `MAX_CELLS`
    TooLarge,
    /// Text did not name one of the four directions
    UnknownDirection,
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::EmptyDimensions => write!(f, "maze dimensions must be at least 1x1"),
            MazeError::TooLarge => write!(f, "maze may have at most {} cells", MAX_CELLS),
            MazeError::UnknownDirection => write!(f, "direction must be one of up, right, down, left"),
        }
    }
}

impl core::error::Error for MazeError {}

/// A generated maze: `width * height` cells in one row-major buffer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl Maze {
    /// Generate a maze with the default braid chance
    ///
    /// # Panics
    /// If `width` or `height` is zero.
    pub fn generate<R: MazeRng>(width: usize, height: usize, rng: &mut R) -> Self {
        match Self::try_generate_braided(width, height, BRAID_PERCENT, rng) {
            Ok(maze) => maze,
            Err(e) => panic!("{}", e),
        }
    }

    /// Generate a maze deterministically from a seed
    ///
    /// Same seed and dimensions always produce the same maze.
    pub fn from_seed(width: usize, height: usize, seed: u32) -> Self {
        Self::generate(width, height, &mut SimpleLCG::new(seed))
    }

    pub fn try_generate<R: MazeRng>(width: usize, height: usize, rng: &mut R) -> Result<Self, MazeError> {
        Self::try_generate_braided(width, height, BRAID_PERCENT, rng)
    }

    /// Carve, then braid with `braid_percent` chance per cell
    pub fn try_generate_braided<R: MazeRng>(
        width: usize,
        height: usize,
        braid_percent: usize,
        rng: &mut R,
    ) -> Result<Self, MazeError> {
        let mut maze = Self::carve_only(width, height, rng)?;
        maze.braid(braid_percent, rng);
        Ok(maze)
    }

    /// Spanning-tree maze without the braid pass
    pub fn carve_only<R: MazeRng>(width: usize, height: usize, rng: &mut R) -> Result<Self, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::EmptyDimensions);
        }
        let len = width
            .checked_mul(height)
            .filter(|&len| len <= MAX_CELLS)
            .ok_or(MazeError::TooLarge)?;

        let mut maze = Self {
            cells: vec![Cell::new(); len],
            width,
            height,
        };
        maze.recursive_backtracker(rng);
        Ok(maze)
    }

    /// Recursive backtracker (iterative with explicit stack)
    ///
    /// The visited flags only exist for the duration of the carve.
    fn recursive_backtracker<R: MazeRng>(&mut self, rng: &mut R) {
        let mut visited = vec![false; self.cells.len()];
        let mut stack = Vec::with_capacity(self.cells.len());

        let start = Position::new(0, 0);
        visited[self.index(start)] = true;
        stack.push(start);

        while let Some(&current) = stack.last() {
            let (neighbors, count) = self.unvisited_neighbors(current, &visited);

            if count == 0 {
                stack.pop();
                continue;
            }

            let (dir, next) = neighbors[rng.choice_index(count)];
            self.remove_wall(current, dir);
            visited[self.index(next)] = true;
            stack.push(next);
        }
    }

    /// Unvisited in-bounds neighbours, scanned in `Direction::ALL` order
    fn unvisited_neighbors(&self, pos: Position, visited: &[bool]) -> ([(Direction, Position); 4], usize) {
        let mut neighbors = [(Direction::Up, pos); 4];
        let mut count = 0;

        for dir in Direction::ALL {
            if let Some(next) = self.neighbor(pos, dir) {
                if !visited[self.index(next)] {
                    neighbors[count] = (dir, next);
                    count += 1;
                }
            }
        }

        (neighbors, count)
    }

    /// Remove one extra interior wall from a share of the cells
    fn braid<R: MazeRng>(&mut self, braid_percent: usize, rng: &mut R) {
        for y in 0..self.height {
            for x in 0..self.width {
                if !rng.chance(braid_percent, 100) {
                    continue;
                }

                let pos = Position::new(x, y);
                let mut candidates = [Direction::Up; 4];
                let mut count = 0;
                for dir in Direction::ALL {
                    if self.cell_at(pos).wall(dir) && self.neighbor(pos, dir).is_some() {
                        candidates[count] = dir;
                        count += 1;
                    }
                }

                if count > 0 {
                    let dir = candidates[rng.choice_index(count)];
                    self.remove_wall(pos, dir);
                }
            }
        }
    }

    /// Clear the wall on `side` of `pos` and the facing wall of its neighbour
    ///
    /// Boundary sides have no neighbour and are left untouched.
    fn remove_wall(&mut self, pos: Position, side: Direction) {
        if let Some(next) = self.neighbor(pos, side) {
            let a = self.index(pos);
            let b = self.index(next);
            self.cells[a].walls[side.index()] = false;
            self.cells[b].walls[side.opposite().index()] = false;
        }
    }

    fn index(&self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }

    fn cell_at(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Position {
        Position::new(0, 0)
    }

    /// The bottom-right cell
    pub fn goal(&self) -> Position {
        Position::new(self.width - 1, self.height - 1)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        let pos = Position::new(x, y);
        self.contains(pos).then(|| self.cell_at(pos))
    }

    /// Cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Position::new(i % self.width, i / self.width), cell))
    }

    /// Whether a wall blocks `dir` from `pos`; out-of-bounds cells count as walled
    pub fn has_wall(&self, pos: Position, dir: Direction) -> bool {
        self.cell(pos.x, pos.y).map_or(true, |cell| cell.wall(dir))
    }

    /// The adjacent in-bounds cell in `dir`, ignoring walls
    pub fn neighbor(&self, pos: Position, dir: Direction) -> Option<Position> {
        if !self.contains(pos) {
            return None;
        }
        let (dx, dy) = dir.delta();
        let x = pos.x.checked_add_signed(dx)?;
        let y = pos.y.checked_add_signed(dy)?;
        let next = Position::new(x, y);
        self.contains(next).then_some(next)
    }

    /// The cell reached by moving `dir` from `pos`, if no wall is in the way
    pub fn step(&self, pos: Position, dir: Direction) -> Option<Position> {
        if self.has_wall(pos, dir) {
            return None;
        }
        self.neighbor(pos, dir)
    }

    /// Breadth-first shortest route between two cells over open passages
    pub fn shortest_path(&self, from: Position, to: Position) -> Option<Vec<Direction>> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }

        let mut came_from: Vec<Option<(Position, Direction)>> = vec![None; self.cells.len()];
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        seen[self.index(from)] = true;
        queue.push_back(from);

        while let Some(pos) = queue.pop_front() {
            if pos == to {
                break;
            }
            for dir in Direction::ALL {
                if let Some(next) = self.step(pos, dir) {
                    let i = self.index(next);
                    if !seen[i] {
                        seen[i] = true;
                        came_from[i] = Some((pos, dir));
                        queue.push_back(next);
                    }
                }
            }
        }

        if !seen[self.index(to)] {
            return None;
        }

        let mut moves = Vec::new();
        let mut pos = to;
        while let Some((prev, dir)) = came_from[self.index(pos)] {
            moves.push(dir);
            pos = prev;
        }
        moves.reverse();
        Some(moves)
    }

    /// Convert maze to binary grid representation
    ///
    /// Creates a grid where:
    /// - 0 = wall
    /// - 1 = path (walkable cell or open passage)
    ///
    /// For a maze of W columns and H rows the grid is (H*2 + 1) rows by
    /// (W*2 + 1) columns, and cell centres sit at (y*2+1, x*2+1).
    pub fn to_binary_grid(&self) -> Vec<Vec<u8>> {
        let mut grid = vec![vec![0u8; self.width * 2 + 1]; self.height * 2 + 1];

        for (pos, cell) in self.cells() {
            let gr = pos.y * 2 + 1;
            let gc = pos.x * 2 + 1;

            grid[gr][gc] = 1;

            if !cell.top() {
                grid[gr - 1][gc] = 1;
            }
            if !cell.bottom() {
                grid[gr + 1][gc] = 1;
            }
            if !cell.right() {
                grid[gr][gc + 1] = 1;
            }
            if !cell.left() {
                grid[gr][gc - 1] = 1;
            }
        }

        grid
    }
}
