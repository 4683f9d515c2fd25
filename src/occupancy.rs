use crate::config::GridPos;
use crate::VehicleId;
use std::collections::HashMap;

/// Records which vehicle holds each grid cell.
///
/// Claims are last-writer-wins: vehicles are stepped one at a time, so the
/// iteration order of the simulation decides who holds a contested cell.
#[derive(Clone, Debug, Default)]
pub struct Occupancy {
    cells: HashMap<GridPos, VehicleId>,
}

impl Occupancy {
    pub fn new() -> Self {
        Default::default()
    }

    /// Whether any vehicle holds the cell.
    pub fn is_occupied(&self, tile: GridPos) -> bool {
        self.cells.contains_key(&tile)
    }

    /// Whether a vehicle other than `owner` holds the cell.
    pub fn is_occupied_by_other(&self, tile: GridPos, owner: VehicleId) -> bool {
        self.cells.get(&tile).map_or(false, |id| *id != owner)
    }

    /// Gets the vehicle holding the cell, if any.
    pub fn owner(&self, tile: GridPos) -> Option<VehicleId> {
        self.cells.get(&tile).copied()
    }

    /// Claims the cell for `owner`, replacing any existing claim.
    pub fn claim(&mut self, tile: GridPos, owner: VehicleId) {
        self.cells.insert(tile, owner);
    }

    /// Releases the cell, whoever holds it.
    pub fn release(&mut self, tile: GridPos) {
        self.cells.remove(&tile);
    }

    /// Releases every cell held by `owner`.
    pub fn release_all(&mut self, owner: VehicleId) {
        self.cells.retain(|_, id| *id != owner);
    }

    /// Returns an iterator over all the current claims.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, VehicleId)> + '_ {
        self.cells.iter().map(|(tile, id)| (*tile, *id))
    }

    /// The number of claimed cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
