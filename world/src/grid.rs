//! Dense occupancy grid recording which plant holds every cell.

use lane_defence_core::{CellCoord, PlacementError, PlantId};
use thiserror::Error;

/// Violations of the one-plant-per-cell contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The cell already hosts a plant.
    #[error("cell ({}, {}) is held by plant {}", .cell.row(), .cell.column(), .occupant.get())]
    CellOccupied {
        /// Cell that was requested.
        cell: CellCoord,
        /// Plant currently holding the cell.
        occupant: PlantId,
    },
    /// The cell lies outside the grid.
    #[error("cell ({}, {}) lies outside the grid", .cell.row(), .cell.column())]
    OutOfBounds {
        /// Cell that was requested.
        cell: CellCoord,
    },
}

impl From<GridError> for PlacementError {
    fn from(error: GridError) -> Self {
        match error {
            GridError::CellOccupied { .. } => PlacementError::Occupied,
            GridError::OutOfBounds { .. } => PlacementError::OutOfBounds,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Grid {
    rows: u32,
    columns: u32,
    cells: Vec<Option<PlantId>>,
}

impl Grid {
    pub(crate) fn new(rows: u32, columns: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            rows,
            columns,
            cells: vec![None; capacity],
        }
    }

    pub(crate) fn cell_occupied(&self, cell: CellCoord) -> bool {
        self.occupant(cell).is_some()
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<PlantId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Fails without side effects when the cell cannot accept a plant.
    pub(crate) fn check(&self, cell: CellCoord) -> Result<(), GridError> {
        let index = self.index(cell).ok_or(GridError::OutOfBounds { cell })?;
        match self.cells.get(index).copied().flatten() {
            Some(occupant) => Err(GridError::CellOccupied { cell, occupant }),
            None => Ok(()),
        }
    }

    pub(crate) fn place(&mut self, cell: CellCoord, plant: PlantId) -> Result<(), GridError> {
        self.check(cell)?;
        let index = self.index(cell).ok_or(GridError::OutOfBounds { cell })?;
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = Some(plant);
        }
        Ok(())
    }

    pub(crate) fn remove(&mut self, cell: CellCoord) -> Option<PlantId> {
        let index = self.index(cell)?;
        self.cells.get_mut(index).and_then(Option::take)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
