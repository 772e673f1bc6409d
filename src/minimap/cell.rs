use crate::utils::Color;

// ----------------------------------------------
// RelativeHeight
// ----------------------------------------------

// Surface height relative to the observer, drives cell shading.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RelativeHeight {
    Below,
    #[default]
    Level,
    Above,
}

impl RelativeHeight {
    #[inline]
    pub fn classify(surface_y: i32, center_y: i32) -> Self {
        if surface_y < center_y {
            Self::Below
        } else if surface_y > center_y {
            Self::Above
        } else {
            Self::Level
        }
    }

    // Channel offset applied to the base color.
    #[inline]
    pub fn shade_delta(self, shading_delta: i32) -> i32 {
        match self {
            Self::Below => -shading_delta,
            Self::Level => 0,
            Self::Above => shading_delta,
        }
    }
}

// ----------------------------------------------
// TerrainCell
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TerrainCell {
    pub color: Color,
    pub height: RelativeHeight,
}

impl TerrainCell {
    // Unsampled or void. Never drawn.
    pub const EMPTY: Self = Self { color: Color::TRANSPARENT, height: RelativeHeight::Level };

    #[inline]
    pub const fn new(color: Color, height: RelativeHeight) -> Self {
        Self { color, height }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.color.is_transparent()
    }
}

impl Default for TerrainCell {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

// ----------------------------------------------
// TerrainGrid
// ----------------------------------------------

pub const DEFAULT_GRID_SIDE: i32 = 128;
pub const MAX_GRID_SIDE: i32 = 512;

// Square grid of cells centered on a block origin.
// Cell (dx, dz) is stored at column dx + offset, row dz + offset.
#[derive(Clone)]
pub struct TerrainGrid {
    side: i32,
    cells: Vec<TerrainCell>,
}

impl TerrainGrid {
    pub fn new(side: i32) -> Self {
        let side = Self::normalized_side(side);
        Self {
            side,
            cells: vec![TerrainCell::EMPTY; (side * side) as usize],
        }
    }

    // Even sides only, so offsets cover [-side/2, side/2) exactly.
    #[inline]
    pub const fn normalized_side(side: i32) -> i32 {
        let side = if side < 2 { 2 } else if side > MAX_GRID_SIDE { MAX_GRID_SIDE } else { side };
        (side / 2) * 2
    }

    #[inline]
    pub fn side(&self) -> i32 {
        self.side
    }

    #[inline]
    pub fn offset(&self) -> i32 {
        self.side / 2
    }

    // Largest |dx| / |dz| with a backing cell (for negative offsets).
    #[inline]
    pub fn radius(&self) -> i32 {
        self.side / 2
    }

    #[inline]
    pub fn cells(&self) -> &[TerrainCell] {
        &self.cells
    }

    pub fn clear(&mut self) {
        self.cells.fill(TerrainCell::EMPTY);
    }

    #[inline]
    pub fn contains_offset(&self, dx: i32, dz: i32) -> bool {
        let offset = self.offset();
        let (col, row) = (dx + offset, dz + offset);
        col >= 0 && col < self.side && row >= 0 && row < self.side
    }

    // Out of range offsets read as EMPTY.
    #[inline]
    pub fn get(&self, dx: i32, dz: i32) -> TerrainCell {
        match self.offset_to_index(dx, dz) {
            Some(index) => self.cells[index],
            None => TerrainCell::EMPTY,
        }
    }

    // Out of range offsets are ignored.
    #[inline]
    pub fn set(&mut self, dx: i32, dz: i32, cell: TerrainCell) {
        if let Some(index) = self.offset_to_index(dx, dz) {
            self.cells[index] = cell;
        }
    }

    pub fn non_empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    #[inline]
    fn offset_to_index(&self, dx: i32, dz: i32) -> Option<usize> {
        if !self.contains_offset(dx, dz) {
            return None;
        }
        let offset = self.offset();
        Some(((dx + offset) + ((dz + offset) * self.side)) as usize)
    }
}

impl Default for TerrainGrid {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIDE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_addressing() {
        let mut grid = TerrainGrid::new(128);
        assert_eq!(grid.offset(), 64);
        assert_eq!(grid.cells().len(), 128 * 128);

        let cell = TerrainCell::new(Color::from_rgb(0x2E8B57), RelativeHeight::Above);
        grid.set(-64, -64, cell);
        grid.set(63, 63, cell);
        grid.set(64, 0, cell); // out of range, ignored

        assert_eq!(grid.get(-64, -64), cell);
        assert_eq!(grid.get(63, 63), cell);
        assert_eq!(grid.get(64, 0), TerrainCell::EMPTY);
        assert_eq!(grid.non_empty_count(), 2);

        assert_eq!(grid.cells()[0], cell);
        assert_eq!(grid.cells()[(128 * 128) - 1], cell);

        grid.clear();
        assert_eq!(grid.non_empty_count(), 0);
    }

    #[test]
    fn test_odd_sides_round_down() {
        let grid = TerrainGrid::new(31);
        assert_eq!(grid.side(), 30);
        assert_eq!(TerrainGrid::new(0).side(), 2);
    }

    #[test]
    fn test_huge_sides_are_capped() {
        assert_eq!(TerrainGrid::normalized_side(70000), MAX_GRID_SIDE);
        assert_eq!(TerrainGrid::normalized_side(i32::MAX), MAX_GRID_SIDE);

        let grid = TerrainGrid::new(70000);
        assert_eq!(grid.side(), MAX_GRID_SIDE);
        assert_eq!(grid.cells().len(), (MAX_GRID_SIDE * MAX_GRID_SIDE) as usize);
    }

    #[test]
    fn test_relative_height() {
        assert_eq!(RelativeHeight::classify(63, 64), RelativeHeight::Below);
        assert_eq!(RelativeHeight::classify(64, 64), RelativeHeight::Level);
        assert_eq!(RelativeHeight::classify(65, 64), RelativeHeight::Above);
        assert_eq!(RelativeHeight::Below.shade_delta(20), -20);
        assert_eq!(RelativeHeight::Above.shade_delta(20), 20);
        assert!(TerrainCell::EMPTY.is_empty());
    }
}
