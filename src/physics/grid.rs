//! Uniform spatial grid that owns every live particle.
//!
//! The world rectangle is cut into `edge × edge` cells. Each particle lives in
//! exactly one cell's collection, the one matching its cached [`CellCoord`].
//! Force evaluation only looks at the 3×3 block around a particle's cell, which
//! bounds the pairwise cost per particle by local density instead of `n`.

use crate::physics::aabb2d::Aabb2d;
use crate::physics::error::SimulationError;
use crate::physics::math::{Scalar, Vector, grid_coordinate};
use crate::physics::particle::{CellCoord, Particle, ParticleId, ParticleSpec};
use bevy::prelude::*;
use core::mem;

/// Counts produced by one [`SpatialGrid::migrate`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Particles moved to a different cell
    pub moved: usize,
    /// Particles whose computed cell fell outside the grid and was clamped
    pub clamped: usize,
}

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    bounds: Aabb2d,
    edge: usize,
    cell_size: Vector,
    // Index = y * edge + x
    cells: Vec<Vec<Particle>>,
    next_id: u64,
}

impl SpatialGrid {
    pub fn new(bounds: Aabb2d, edge: usize) -> Result<Self, SimulationError> {
        if edge == 0 {
            return Err(SimulationError::InvalidEdge(edge));
        }
        let size = bounds.size();
        if !(size.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(SimulationError::InvalidWorld {
                width: size.x,
                height: size.y,
            });
        }

        Ok(Self {
            bounds,
            edge,
            cell_size: size / edge as Scalar,
            cells: vec![Vec::new(); edge * edge],
            next_id: 0,
        })
    }

    #[inline]
    pub fn bounds(&self) -> &Aabb2d {
        &self.bounds
    }

    #[inline]
    pub fn edge(&self) -> usize {
        self.edge
    }

    #[inline]
    pub fn cell_size(&self) -> Vector {
        self.cell_size
    }

    #[inline]
    pub fn index_of(&self, coord: CellCoord) -> usize {
        coord.y * self.edge + coord.x
    }

    #[inline]
    pub fn coord_of(&self, index: usize) -> CellCoord {
        CellCoord::new(index % self.edge, index / self.edge)
    }

    /// Cell containing `position`, clamped into the grid.
    ///
    /// The flag is true when the floor-divided coordinate fell outside
    /// `[0, edge)` on either axis and had to be pulled back in.
    pub fn clamp_to_grid(&self, position: Vector) -> (CellCoord, bool) {
        let local = position - self.bounds.min;
        let (x, x_clamped) = self.clamp_axis(grid_coordinate(local.x, self.cell_size.x));
        let (y, y_clamped) = self.clamp_axis(grid_coordinate(local.y, self.cell_size.y));
        (CellCoord::new(x, y), x_clamped || y_clamped)
    }

    fn clamp_axis(&self, coordinate: i64) -> (usize, bool) {
        let last = self.edge - 1;
        if coordinate < 0 {
            (0, true)
        } else if coordinate as u64 > last as u64 {
            (last, true)
        } else {
            (coordinate as usize, false)
        }
    }

    /// Flat cell index for `position`, logging when it had to be clamped.
    pub fn cell_index_for(&self, position: Vector) -> usize {
        let (coord, clamped) = self.clamp_to_grid(position);
        if clamped {
            warn!(
                "Position {} maps outside the {}x{} grid; clamped to cell ({}, {})",
                position, self.edge, self.edge, coord.x, coord.y
            );
        }
        self.index_of(coord)
    }

    /// Creates a particle from `spec` and buckets it into its initial cell.
    pub fn spawn(&mut self, spec: &ParticleSpec, density: Scalar) -> Result<ParticleId, SimulationError> {
        spec.validate()?;

        let id = ParticleId(self.next_id);
        self.next_id += 1;

        let index = self.cell_index_for(spec.position);
        let particle = Particle::new(id, spec, density, self.coord_of(index));
        self.cells[index].push(particle);
        Ok(id)
    }

    /// Re-admits a particle (for example one previously [`remove`](Self::remove)d),
    /// recomputing its cell. Returns the cell index it landed in.
    ///
    /// Fails if a particle with the same id is already in the grid.
    pub fn insert(&mut self, mut particle: Particle) -> Result<usize, SimulationError> {
        if self.find(particle.id()).is_some() {
            return Err(SimulationError::DuplicateParticle(particle.id()));
        }

        // Keep fresh ids clear of particles admitted from elsewhere
        self.next_id = self.next_id.max(particle.id().0 + 1);

        let index = self.cell_index_for(particle.position);
        particle.cell = self.coord_of(index);
        self.cells[index].push(particle);
        Ok(index)
    }

    /// Takes the particle with `id` out of cell `from_cell`.
    pub fn remove(&mut self, id: ParticleId, from_cell: usize) -> Option<Particle> {
        let cell = self.cells.get_mut(from_cell)?;
        let slot = cell.iter().position(|particle| particle.id() == id)?;
        Some(cell.swap_remove(slot))
    }

    /// Recomputes the cell of the particle with `id` and moves it if it changed.
    ///
    /// Returns `Some(true)` if the particle moved, `Some(false)` if it stayed,
    /// and `None` if no such particle exists.
    pub fn relocate(&mut self, id: ParticleId) -> Option<bool> {
        let from = self.cell_index_of(id)?;
        let slot = self.cells[from].iter().position(|particle| particle.id() == id)?;
        let to = self.cell_index_for(self.cells[from][slot].position);
        if to == from {
            return Some(false);
        }

        let mut particle = self.cells[from].swap_remove(slot);
        particle.cell = self.coord_of(to);
        self.cells[to].push(particle);
        Some(true)
    }

    /// Re-buckets every particle whose position left its cached cell.
    ///
    /// Each cell's collection is taken out whole and split into stayers and
    /// leavers; leavers are only pushed into their destinations after every
    /// cell has been split, so no collection is mutated while it is iterated.
    pub fn migrate(&mut self) -> MigrationReport {
        let mut report = MigrationReport::default();
        let mut leaving: Vec<(usize, Particle)> = Vec::new();

        for index in 0..self.cells.len() {
            let current = mem::take(&mut self.cells[index]);
            let mut staying = Vec::with_capacity(current.len());

            for mut particle in current {
                let (coord, clamped) = self.clamp_to_grid(particle.position);
                if clamped {
                    report.clamped += 1;
                    warn!(
                        "Particle {} at {} left the grid; clamped to cell ({}, {})",
                        particle.id().value(),
                        particle.position,
                        coord.x,
                        coord.y
                    );
                }

                let destination = self.index_of(coord);
                particle.cell = coord;
                if destination == index {
                    staying.push(particle);
                } else {
                    leaving.push((destination, particle));
                }
            }

            self.cells[index] = staying;
        }

        report.moved = leaving.len();
        for (destination, particle) in leaving {
            self.cells[destination].push(particle);
        }

        report
    }

    /// Particles in the 3×3 block of cells centered on `cell`.
    ///
    /// Rows and columns outside the grid are skipped. Iteration order is row
    /// by row, then by insertion order within a cell, so it is stable within a tick.
    pub fn neighbors_of(&self, cell: CellCoord) -> impl Iterator<Item = &Particle> + '_ {
        let edge = self.edge;
        let columns = cell.x.saturating_sub(1)..=(cell.x + 1).min(edge - 1);
        let rows = cell.y.saturating_sub(1)..=(cell.y + 1).min(edge - 1);

        rows.flat_map(move |y| columns.clone().map(move |x| y * edge + x))
            .flat_map(move |index| self.cells[index].iter())
    }

    /// Every cell's collection, indexed by `y * edge + x`.
    #[inline]
    pub fn cells(&self) -> &[Vec<Particle>] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [Vec<Particle>] {
        &mut self.cells
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.cells.iter().flatten()
    }

    pub(crate) fn particles_mut(&mut self) -> impl Iterator<Item = &mut Particle> + '_ {
        self.cells.iter_mut().flatten()
    }

    pub fn find(&self, id: ParticleId) -> Option<&Particle> {
        self.particles().find(|particle| particle.id() == id)
    }

    /// Index of the cell whose collection holds `id`.
    pub fn cell_index_of(&self, id: ParticleId) -> Option<usize> {
        self.cells
            .iter()
            .position(|cell| cell.iter().any(|particle| particle.id() == id))
    }

    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }

    /// Drops every particle. Ids keep counting up so they are never reused.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(Vec::clear);
    }

    /// Keeps only the particles matching `keep`; returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&Particle) -> bool) -> usize {
        let before = self.len();
        for cell in &mut self.cells {
            cell.retain(|particle| keep(particle));
        }
        before - self.len()
    }

    /// Id of the longest-lived particle.
    pub fn oldest(&self) -> Option<ParticleId> {
        self.particles().map(Particle::id).min()
    }

    /// Checks that every particle sits in the cell its position maps to and
    /// that its cached coordinate agrees with the collection holding it.
    pub fn check_consistency(&self) -> Result<(), ParticleId> {
        for (index, cell) in self.cells.iter().enumerate() {
            for particle in cell {
                let (expected, _) = self.clamp_to_grid(particle.position);
                if particle.cell != expected || self.index_of(particle.cell) != index {
                    return Err(particle.id());
                }
            }
        }
        Ok(())
    }
}
