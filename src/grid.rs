use crate::types::{Direction, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
}

impl Grid {
    pub const fn new(cols: i32, rows: i32) -> Self {
        Self { cols, rows }
    }

    pub fn center(&self) -> Position {
        Position::new(self.cols / 2, self.rows / 2)
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.col >= 0 && position.row >= 0 && position.col < self.cols && position.row < self.rows
    }

    pub fn wrap(&self, col: i32, row: i32) -> Position {
        Position::new(col.rem_euclid(self.cols), row.rem_euclid(self.rows))
    }

    pub fn offset_wrapped(&self, from: Position, dir: Direction) -> Position {
        let (dx, dy) = dir.delta();
        self.wrap(from.col + dx, from.row + dy)
    }

    /// `None` when the step would leave the grid.
    pub fn offset_bounded(&self, from: Position, dir: Direction) -> Option<Position> {
        let (dx, dy) = dir.delta();
        let next = Position::new(from.col + dx, from.row + dy);
        self.in_bounds(next).then_some(next)
    }

    pub fn farthest_corner(&self, from: Position) -> Position {
        let col = if from.col * 2 < self.cols - 1 {
            self.cols - 1
        } else {
            0
        };
        let row = if from.row * 2 < self.rows - 1 {
            self.rows - 1
        } else {
            0
        };
        Position::new(col, row)
    }
}
