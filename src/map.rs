use crate::error::{CastError, Result};
use crate::vec2::Vec2;

/// Level layout used when the app starts: a walled 10x10 room with two pillars.
#[rustfmt::skip]
const DEMO_CELLS: [[u8; 10]; 10] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// Immutable grid of cell codes, stored row-major.
/// Code 0 is open floor, anything else is wall.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl TileMap {
    pub fn new(width: usize, height: usize, cells: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CastError::invalid_map(format!("empty grid {width}x{height}")));
        }
        if cells.len() != width * height {
            return Err(CastError::invalid_map(format!(
                "{} cells do not fill a {width}x{height} grid",
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(CastError::invalid_map(format!(
                    "row {y} has {} cells, expected {width}",
                    row.len()
                )));
            }
            cells.extend_from_slice(row);
        }
        Self::new(width, rows.len(), cells)
    }

    pub fn demo() -> Self {
        Self {
            width: 10,
            height: 10,
            cells: DEMO_CELLS.iter().flatten().copied().collect(),
        }
    }

    /// Empty room of the given size, enclosed by a ring of code-1 walls.
    pub fn bordered_room(width: usize, height: usize) -> Result<Self> {
        if width < 3 || height < 3 {
            return Err(CastError::invalid_map(format!(
                "room {width}x{height} has no interior"
            )));
        }
        let cells = (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| {
                    let edge = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                    u8::from(edge)
                })
            })
            .collect();
        Self::new(width, height, cells)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell code at (x, y), `None` outside the grid.
    #[inline]
    pub fn cell(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width + x as usize])
    }

    /// Outside the grid counts as solid.
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_none_or(|code| code != 0)
    }

    /// Whether `pos` lies within the grid rectangle (walls included).
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.y >= 0.0 && pos.x < self.width as f64 && pos.y < self.height as f64
    }

    /// Whether `pos` is inside the grid and on an open (code 0) cell.
    pub fn is_open_at(&self, pos: Vec2) -> bool {
        self.contains(pos) && !self.is_solid(pos.x.floor() as i32, pos.y.floor() as i32)
    }

    /// True when every border cell is solid, so any ray cast from inside hits a wall.
    pub fn is_enclosed(&self) -> bool {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..w).all(|x| self.is_wall_cell(x, 0) && self.is_wall_cell(x, h - 1))
            && (0..h).all(|y| self.is_wall_cell(0, y) && self.is_wall_cell(w - 1, y))
    }

    fn is_wall_cell(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_some_and(|code| code != 0)
    }

    /// Iterate over (x, y, code) for every cell, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &code)| (i % self.width, i / self.width, code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_map_is_enclosed() {
        let map = TileMap::demo();
        assert_eq!((map.width(), map.height()), (10, 10));
        assert!(map.is_enclosed());
        assert!(map.is_solid(2, 3));
        assert!(map.is_solid(7, 7));
        assert!(!map.is_solid(5, 5));
    }

    #[test]
    fn lookups_outside_grid() {
        let map = TileMap::demo();
        assert_eq!(map.cell(-1, 0), None);
        assert_eq!(map.cell(0, 10), None);
        assert!(map.is_solid(10, 4));
        assert!(map.contains(Vec2::new(0.0, 9.99)));
        assert!(!map.contains(Vec2::new(10.0, 5.0)));
        assert!(!map.contains(Vec2::new(-0.01, 5.0)));
    }

    #[test]
    fn open_cells_exclude_walls() {
        let map = TileMap::demo();
        assert!(map.is_open_at(Vec2::new(5.5, 5.5)));
        assert!(!map.is_open_at(Vec2::new(0.9, 5.4)));
        assert!(!map.is_open_at(Vec2::new(2.5, 3.5)));
        assert!(!map.is_open_at(Vec2::new(-0.5, 5.0)));
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let rows: [&[u8]; 2] = [&[1, 1, 1], &[1, 0]];
        let err = TileMap::from_rows(&rows).unwrap_err();
        assert_eq!(err, CastError::invalid_map("row 1 has 2 cells, expected 3"));

        let empty: [&[u8]; 0] = [];
        assert!(TileMap::from_rows(&empty).is_err());
    }

    #[test]
    fn new_rejects_wrong_cell_count() {
        assert!(TileMap::new(3, 3, vec![0; 8]).is_err());
        assert!(TileMap::new(3, 3, vec![0; 9]).is_ok());
    }

    #[test]
    fn bordered_room_has_open_interior() {
        let map = TileMap::bordered_room(6, 4).unwrap();
        assert!(map.is_enclosed());
        let open = map.iter().filter(|&(_, _, code)| code == 0).count();
        assert_eq!(open, 4 * 2);
        assert!(TileMap::bordered_room(2, 5).is_err());
    }

    #[test]
    fn open_edge_is_not_enclosed() {
        let rows: [&[u8]; 3] = [&[1, 1, 1], &[1, 0, 0], &[1, 1, 1]];
        let map = TileMap::from_rows(&rows).unwrap();
        assert!(!map.is_enclosed());
    }
}
