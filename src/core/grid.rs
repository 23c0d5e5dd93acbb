use crate::core::contact::CONTACT_DISTANCE;
use crate::core::particle::Particle;
use crate::core::vec2::Vec2;
use crate::error::{Error, Result};

/// Uniform-cell broad phase over a fixed axis-aligned region.
///
/// Cells are `CONTACT_DISTANCE` wide, so two touching particles are
/// always in the same or adjacent cells and the candidate sweep never
/// misses a contact. The grid is rebuilt from scratch every pass;
/// positions outside the region clamp to the border cells, which keeps
/// escaped particles visible to the sweep without growing the grid.
#[derive(Debug)]
pub struct CollisionGrid {
    origin: Vec2,
    inv_cell: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<u32>>,
}

impl CollisionGrid {
    /// Grid covering `min..=max`, padded by one cell on every side so
    /// particles sitting exactly on the boundary land in an interior cell.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if the corners are non-finite or inverted.
    pub fn new(min: Vec2, max: Vec2, cell_size: f32) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::InvalidParam("grid corners must be finite".into()));
        }
        if max.x <= min.x || max.y <= min.y {
            return Err(Error::InvalidParam(
                "grid max corner must exceed min corner in both axes".into(),
            ));
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(Error::InvalidParam("cell size must be finite and > 0".into()));
        }
        let cols = ((max.x - min.x) / cell_size).ceil() as usize + 2;
        let rows = ((max.y - min.y) / cell_size).ceil() as usize + 2;
        Ok(Self {
            origin: min - Vec2::new(cell_size, cell_size),
            inv_cell: 1.0 / cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
        })
    }

    /// Grid sized for particle contact over the given region.
    pub fn for_region(min: Vec2, max: Vec2) -> Result<Self> {
        Self::new(min, max, CONTACT_DISTANCE)
    }

    /// Drop the previous pass and re-bin every particle by position.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        for cell in &mut self.cells {
            cell.clear();
        }
        for (i, p) in particles.iter().enumerate() {
            let (cx, cy) = self.cell_of(p.position);
            self.cells[cy * self.cols + cx].push(i as u32);
        }
    }

    /// Visit every unordered candidate pair exactly once: all pairs
    /// within a cell, plus all cross pairs with the four forward
    /// neighbors (east, south-west, south, south-east).
    pub fn for_each_candidate_pair(&self, mut f: impl FnMut(usize, usize)) {
        const FORWARD: [(isize, isize); 4] = [(1, 0), (-1, 1), (0, 1), (1, 1)];
        for cy in 0..self.rows {
            for cx in 0..self.cols {
                let cell = &self.cells[cy * self.cols + cx];
                for (a, &i) in cell.iter().enumerate() {
                    for &j in &cell[a + 1..] {
                        f(i as usize, j as usize);
                    }
                }
                for (dx, dy) in FORWARD {
                    let nx = cx as isize + dx;
                    let ny = cy as isize + dy;
                    if nx < 0 || ny < 0 || nx >= self.cols as isize || ny >= self.rows as isize {
                        continue;
                    }
                    let neighbor = &self.cells[ny as usize * self.cols + nx as usize];
                    for &i in cell {
                        for &j in neighbor {
                            f(i as usize, j as usize);
                        }
                    }
                }
            }
        }
    }

    fn cell_of(&self, p: Vec2) -> (usize, usize) {
        let cx = ((p.x - self.origin.x) * self.inv_cell).floor();
        let cy = ((p.y - self.origin.y) * self.inv_cell).floor();
        let cx = (cx.max(0.0) as usize).min(self.cols - 1);
        let cy = (cy.max(0.0) as usize).min(self.rows - 1);
        (cx, cy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particles_at(positions: &[(f32, f32)]) -> Vec<Particle> {
        positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Particle::new(i as u32, Vec2::new(x, y)).unwrap())
            .collect()
    }

    fn collect_pairs(grid: &CollisionGrid) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        grid.for_each_candidate_pair(|i, j| {
            pairs.push(if i < j { (i, j) } else { (j, i) });
        });
        pairs
    }

    #[test]
    fn degenerate_region_rejected() {
        assert!(CollisionGrid::for_region(Vec2::new(5.0, 0.0), Vec2::new(5.0, 10.0)).is_err());
        assert!(CollisionGrid::new(Vec2::ZERO, Vec2::new(10.0, 10.0), 0.0).is_err());
    }

    #[test]
    fn touching_particles_become_a_candidate_pair() -> Result<()> {
        let mut grid = CollisionGrid::for_region(Vec2::ZERO, Vec2::new(10.0, 10.0))?;
        grid.rebuild(&particles_at(&[(2.0, 2.0), (2.7, 2.3), (8.0, 8.0)]));
        let pairs = collect_pairs(&grid);
        assert!(pairs.contains(&(0, 1)), "nearby pair missing: {pairs:?}");
        assert!(!pairs.contains(&(0, 2)), "distant pair reported: {pairs:?}");
        Ok(())
    }

    #[test]
    fn pairs_across_cell_boundaries_visited_once() -> Result<()> {
        // 0.95 apart, straddling the cell line at x=1 (cells are 1 wide).
        let mut grid = CollisionGrid::for_region(Vec2::ZERO, Vec2::new(10.0, 10.0))?;
        grid.rebuild(&particles_at(&[(0.6, 0.5), (1.55, 0.5)]));
        let pairs = collect_pairs(&grid);
        assert_eq!(pairs, vec![(0, 1)]);
        Ok(())
    }

    #[test]
    fn out_of_region_positions_clamp_to_border_cells() -> Result<()> {
        let mut grid = CollisionGrid::for_region(Vec2::ZERO, Vec2::new(10.0, 10.0))?;
        grid.rebuild(&particles_at(&[(-50.0, -50.0), (60.0, 60.0)]));
        // Far-apart escapees must not pair with each other.
        assert!(collect_pairs(&grid).is_empty());
        Ok(())
    }
}
