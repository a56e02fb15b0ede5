//! Generic bounded grid for per-cell data

use crate::core::types::GridPos;

/// Fixed-size 2D grid stored row-major. Dimensions never change after
/// construction; every accessor bounds-checks before indexing.
#[derive(Debug, Clone)]
pub struct Grid<T: Clone + Default> {
    width: i32,
    height: i32,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    /// Panics are impossible here: negative dimensions collapse to an empty grid.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            data: vec![T::default(); width as usize * height as usize],
        }
    }

    pub fn filled(width: i32, height: i32, value: T) -> Self {
        let mut grid = Self::new(width, height);
        grid.data.fill(value);
        grid
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
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    #[inline]
    fn index(&self, pos: GridPos) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, pos: GridPos) -> Option<&T> {
        self.index(pos).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut T> {
        self.index(pos).map(move |i| &mut self.data[i])
    }

    /// Position of the i-th cell in storage order
    #[inline]
    fn position_of(&self, index: usize) -> GridPos {
        let width = self.width as usize;
        GridPos::new((index % width) as i32, (index / width) as i32)
    }

    /// Cells with their positions, row by row
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.position_of(i), cell))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }
}
