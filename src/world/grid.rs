use std::collections::VecDeque;

use glam::Vec2;

use crate::math::cell_of;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
}

/// Runtime snapshot of one level's occupancy grid (immutable after generation).
///
/// Cell `(x, y)` spans `[x, x+1) × [y, y+1)` in world units. Anything outside
/// `[0, width) × [0, height)` is treated as wall, which doubles as the level
/// border.
#[derive(Clone, Debug)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    /// cells reached by the last flood fill (empty until `compute_reachable`)
    reachable: Vec<bool>,
}

impl Grid {
    /// A grid of the given size with every cell solid.
    pub fn solid(width: i32, height: i32) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        let n = (width * height) as usize;
        Self {
            width,
            height,
            cells: vec![Cell::Wall; n],
            reachable: vec![false; n],
        }
    }

    /// A grid of the given size with every cell empty.
    pub fn open(width: i32, height: i32) -> Self {
        let mut g = Self::solid(width, height);
        g.cells.fill(Cell::Empty);
        g
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| (y * self.width + x) as usize)
    }

    pub fn cell(&self, x: i32, y: i32) -> Cell {
        self.index(x, y).map_or(Cell::Wall, |i| self.cells[i])
    }

    /// Writes outside the grid are ignored.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// True for walls and for every out-of-bounds cell.
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.cell(x, y) == Cell::Wall
    }

    #[inline]
    pub fn is_solid_at(&self, p: Vec2) -> bool {
        self.is_solid(cell_of(p.x), cell_of(p.y))
    }

    /// Reachability of a cell from the last flood-fill origin.
    /// Out-of-bounds cells are never reachable.
    #[inline]
    pub fn is_reachable(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.reachable[i])
    }

    pub fn reachable_mask(&self) -> &[bool] {
        &self.reachable
    }

    pub fn open_cells(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Empty).count()
    }

    /// Breadth-first fill over 4-connected empty cells starting at `(sx, sy)`.
    ///
    /// Replaces the previous mask. A solid or out-of-bounds origin yields an
    /// all-false mask.
    pub fn compute_reachable(&mut self, sx: i32, sy: i32) {
        self.reachable = flood_fill(self, sx, sy);
    }
}

fn flood_fill(grid: &Grid, sx: i32, sy: i32) -> Vec<bool> {
    let mut reach = vec![false; grid.cells.len()];
    let mut queue = VecDeque::with_capacity(grid.cells.len() / 4);

    let push = |x: i32, y: i32, reach: &mut Vec<bool>, queue: &mut VecDeque<(i32, i32)>| {
        if let Some(i) = grid.index(x, y) {
            if grid.cells[i] == Cell::Empty && !reach[i] {
                reach[i] = true;
                queue.push_back((x, y));
            }
        }
    };

    push(sx, sy, &mut reach, &mut queue);
    while let Some((x, y)) = queue.pop_front() {
        push(x + 1, y, &mut reach, &mut queue);
        push(x - 1, y, &mut reach, &mut queue);
        push(x, y + 1, &mut reach, &mut queue);
        push(x, y - 1, &mut reach, &mut queue);
    }
    reach
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_pocket() -> Grid {
        // 7x5, open room on the left, sealed single cell on the right
        let mut g = Grid::solid(7, 5);
        for y in 1..4 {
            for x in 1..4 {
                g.set(x, y, Cell::Empty);
            }
        }
        g.set(5, 2, Cell::Empty);
        g
    }

    #[test]
    fn outside_is_solid() {
        let g = Grid::open(4, 3);
        for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 3), (100, 100), (-5, -5)] {
            assert!(g.is_solid(x, y), "({x},{y}) should be solid");
        }
        assert!(!g.is_solid(0, 0));
        assert!(!g.is_solid(3, 2));
        assert!(g.is_solid_at(Vec2::new(-0.01, 1.0)));
        assert!(!g.is_solid_at(Vec2::new(3.99, 2.99)));
    }

    #[test]
    fn set_out_of_bounds_is_ignored() {
        let mut g = Grid::solid(2, 2);
        g.set(5, 5, Cell::Empty);
        assert_eq!(g.open_cells(), 0);
    }

    #[test]
    fn flood_fill_skips_walls_and_pockets() {
        let mut g = with_pocket();
        g.compute_reachable(2, 2);
        assert!(g.is_reachable(1, 1));
        assert!(g.is_reachable(3, 3));
        assert!(!g.is_reachable(5, 2), "sealed pocket must stay unreachable");
        for y in 0..g.height() {
            for x in 0..g.width() {
                if g.is_solid(x, y) {
                    assert!(!g.is_reachable(x, y));
                }
            }
        }
    }

    #[test]
    fn flood_fill_is_idempotent() {
        let mut g = with_pocket();
        g.compute_reachable(1, 1);
        let first = g.reachable_mask().to_vec();
        g.compute_reachable(1, 1);
        assert_eq!(first, g.reachable_mask());
    }

    #[test]
    fn solid_origin_reaches_nothing() {
        let mut g = with_pocket();
        g.compute_reachable(0, 0);
        assert!(g.reachable_mask().iter().all(|r| !r));
        g.compute_reachable(-3, 9);
        assert!(g.reachable_mask().iter().all(|r| !r));
    }
}
