use crate::types::{Pos, TileKind};

/// Row-major rectangular tile grid, `(0, 0)` at the top-left.
///
/// An episode holds two independently owned copies: the static layout
/// produced by generation, and a dynamic working copy where collected keys
/// are downgraded to [`TileKind::Empty`]. The static copy is never mutated
/// after generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<TileKind>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, tiles: vec![TileKind::Empty; width * height] }
    }

    /// Build a grid from glyph rows, the inverse of the ASCII render body.
    /// `' '` and `'.'` both read as empty; unknown glyphs read as walls.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                let tile = match glyph {
                    ' ' | '.' => TileKind::Empty,
                    'S' => TileKind::Start,
                    'G' => TileKind::Goal,
                    'K' => TileKind::Key,
                    'x' => TileKind::Trap,
                    _ => TileKind::Wall,
                };
                grid.set_tile(Pos { y: y as i32, x: x as i32 }, tile);
            }
        }
        grid
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height
    }

    /// Out-of-bounds reads come back as walls so searches never leave the grid.
    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.tiles[self.index(pos)]
    }

    pub fn set_tile(&mut self, pos: Pos, tile: TileKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    /// All positions holding `kind`, in row-major scan order.
    pub fn positions_of(&self, kind: TileKind) -> Vec<Pos> {
        let mut positions = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { y: y as i32, x: x as i32 };
                if self.tile_at(pos) == kind {
                    positions.push(pos);
                }
            }
        }
        positions
    }

    /// First position holding `kind` in scan order, if any.
    pub fn find_unique(&self, kind: TileKind) -> Option<Pos> {
        self.positions_of(kind).into_iter().next()
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| **tile == kind).count()
    }

    /// Canonical little-endian byte form, stable across runs for
    /// fingerprinting and snapshot hashing.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.tiles.len());
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        bytes.extend(self.tiles.iter().map(|tile| tile.code()));
        bytes
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.tile_at(Pos { y: -1, x: 0 }), TileKind::Wall);
        assert_eq!(grid.tile_at(Pos { y: 0, x: 4 }), TileKind::Wall);
        assert_eq!(grid.tile_at(Pos { y: 2, x: 3 }), TileKind::Empty);
    }

    #[test]
    fn from_rows_places_every_glyph() {
        let grid = Grid::from_rows(&["S.K", "#xG"]);
        assert_eq!(grid.width, 3);
        assert_eq!(grid.height, 2);
        assert_eq!(grid.tile_at(Pos { y: 0, x: 0 }), TileKind::Start);
        assert_eq!(grid.tile_at(Pos { y: 0, x: 1 }), TileKind::Empty);
        assert_eq!(grid.tile_at(Pos { y: 0, x: 2 }), TileKind::Key);
        assert_eq!(grid.tile_at(Pos { y: 1, x: 0 }), TileKind::Wall);
        assert_eq!(grid.tile_at(Pos { y: 1, x: 1 }), TileKind::Trap);
        assert_eq!(grid.tile_at(Pos { y: 1, x: 2 }), TileKind::Goal);
    }

    #[test]
    fn positions_of_scans_row_major() {
        let grid = Grid::from_rows(&["K.K", "..K"]);
        assert_eq!(
            grid.positions_of(TileKind::Key),
            vec![Pos { y: 0, x: 0 }, Pos { y: 0, x: 2 }, Pos { y: 1, x: 2 }]
        );
        assert_eq!(grid.count(TileKind::Key), 3);
    }

    #[test]
    fn canonical_bytes_differ_when_a_tile_changes() {
        let mut left = Grid::new(5, 5);
        let right = left.clone();
        assert_eq!(left.canonical_bytes(), right.canonical_bytes());

        left.set_tile(Pos { y: 2, x: 2 }, TileKind::Key);
        assert_ne!(left.canonical_bytes(), right.canonical_bytes());
    }
}
