use crate::config::DepotConfig;
use crate::math::{polar_angle, Point2d};
use crate::network::TrackNetwork;
use crate::occupancy::Occupancy;
use crate::util::{rotated_range, Interval};
use crate::TrackId;
use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The depot, from which all vehicles depart and to which they all return.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Depot {
    /// The centre of the depot.
    position: Point2d,
    /// The width of the depot's footprint.
    width: f64,
    /// The height of the depot's footprint.
    height: f64,
    /// Index of the branch used by the last successful spawn.
    last_branch: Option<usize>,
}

/// The reasons a vehicle could not be spawned.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("no track connects to the depot")]
    NoDepotTracks,

    #[error("every depot branch is occupied")]
    AllBranchesOccupied,
}

impl Depot {
    pub fn new(config: &DepotConfig) -> Self {
        Self {
            position: config.position,
            width: config.width,
            height: config.height,
            last_branch: None,
        }
    }

    /// The centre of the depot.
    pub fn position(&self) -> Point2d {
        self.position
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// The extent of the depot's footprint along the x and y axes.
    pub fn footprint(&self) -> [Interval<f64>; 2] {
        [
            Interval::disc(self.position.x, 0.5 * self.width),
            Interval::disc(self.position.y, 0.5 * self.height),
        ]
    }

    /// Whether the given rectangle overlaps the depot's footprint.
    pub(crate) fn overlaps(&self, rect: [Interval<f64>; 2]) -> bool {
        let [x, y] = self.footprint();
        x.overlaps(&rect[0]) && y.overlaps(&rect[1])
    }

    /// The depot-connected tracks, ordered by their angle around the depot.
    pub fn branches(&self, network: &TrackNetwork) -> Vec<TrackId> {
        network
            .iter()
            .filter(|t| t.is_depot_connected())
            .map(|t| (t.id(), polar_angle(self.position, t.pos())))
            .sorted_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
            .collect()
    }

    /// Chooses the branch the next vehicle should depart along.
    ///
    /// Branches are tried round-robin, starting after the one used by the
    /// previous spawn and skipping any which are occupied.
    pub fn next_branch(
        &mut self,
        network: &TrackNetwork,
        occupancy: &Occupancy,
    ) -> Result<TrackId, SpawnError> {
        let branches = self.branches(network);
        if branches.is_empty() {
            return Err(SpawnError::NoDepotTracks);
        }

        let start = self.last_branch.map_or(0, |idx| idx + 1) % branches.len();
        let idx = rotated_range(branches.len(), start)
            .find(|idx| !occupancy.is_occupied(network[branches[*idx]].tile()))
            .ok_or(SpawnError::AllBranchesOccupied)?;

        self.last_branch = Some(idx);
        Ok(branches[idx])
    }
}
