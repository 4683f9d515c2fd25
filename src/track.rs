use crate::config::GridPos;
use crate::math::Point2d;
use crate::TrackId;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The health a track is laid with.
const INITIAL_HEALTH: f64 = 100.0;

/// A piece of track occupying a single grid cell.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Track {
    /// The track ID.
    id: TrackId,
    /// The grid cell of the track.
    tile: GridPos,
    /// The world space centre of the track.
    pos: Point2d,
    /// The tracks connected to this one. Connections are always mutual.
    neighbours: SmallVec<[TrackId; 4]>,
    /// Whether the track is close enough to the depot to hop to and from it.
    depot_connected: bool,
    /// The kind of track. Currently informational only.
    kind: TrackKind,
    /// The health of the track. Currently informational only.
    health: f64,
}

/// The kind of a track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrackKind {
    #[default]
    Standard,
}

impl Track {
    /// Creates a new, unconnected track.
    pub(crate) fn new(id: TrackId, tile: GridPos, pos: Point2d) -> Self {
        Self {
            id,
            tile,
            pos,
            neighbours: SmallVec::new(),
            depot_connected: false,
            kind: TrackKind::default(),
            health: INITIAL_HEALTH,
        }
    }

    /// Gets the track's ID.
    pub fn id(&self) -> TrackId {
        self.id
    }

    /// The grid cell the track occupies.
    pub fn tile(&self) -> GridPos {
        self.tile
    }

    /// The world space centre of the track.
    pub fn pos(&self) -> Point2d {
        self.pos
    }

    /// The tracks connected to this one.
    pub fn neighbours(&self) -> &[TrackId] {
        &self.neighbours
    }

    /// Whether the track connects directly to the depot.
    pub fn is_depot_connected(&self) -> bool {
        self.depot_connected
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    /// Whether the track is connected to `other`.
    pub fn is_connected_to(&self, other: TrackId) -> bool {
        self.neighbours.contains(&other)
    }

    pub(crate) fn add_neighbour(&mut self, id: TrackId) {
        if id != self.id && !self.neighbours.contains(&id) {
            self.neighbours.push(id);
        }
    }

    pub(crate) fn remove_neighbour(&mut self, id: TrackId) {
        self.neighbours.retain(|n| *n != id);
    }

    pub(crate) fn set_depot_connected(&mut self, connected: bool) {
        self.depot_connected = connected;
    }
}
