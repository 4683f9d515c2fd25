use crate::config::{GridPos, WorldConfig};
use crate::depot::Depot;
use crate::math::{distance, Point2d};
use crate::track::Track;
use crate::{TrackId, TrackSet};
use std::collections::HashMap;

/// Tracks within this many grid cells of each other are connected.
/// Covers the four grid neighbours with some floating point slack.
const ADJACENCY_FACTOR: f64 = 1.1;

/// Tracks within this many grid cells of the depot centre connect to the depot.
const DEPOT_RADIUS_FACTOR: f64 = 3.0;

/// The grid of tracks drawn by the player.
#[derive(Clone, Default)]
pub struct TrackNetwork {
    /// The tracks in the network.
    tracks: TrackSet,
    /// The track occupying each grid cell.
    index: HashMap<GridPos, TrackId>,
    /// The cell of the previous placement or removal, used to debounce
    /// repeated edits during a single drag gesture.
    last_edit: Option<GridPos>,
}

/// The outcome of a call to [TrackNetwork::place].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// A new track was laid.
    Placed(TrackId),
    /// The cell already held a track, which was removed.
    Removed(TrackId),
    /// Nothing changed.
    Rejected(Rejection),
}

/// Why a placement was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The cell lies outside the world bounds.
    OutOfBounds,
    /// The cell overlaps the depot's footprint.
    DepotZone,
    /// The cell was the subject of the immediately preceding edit.
    Debounced,
}

impl TrackNetwork {
    /// Creates an empty network.
    pub fn new() -> Self {
        Default::default()
    }

    /// Toggles a track at the grid cell nearest to `pos`: lays a new track if
    /// the cell is empty, or removes the existing one.
    pub fn place(&mut self, pos: Point2d, config: &WorldConfig, depot: &Depot) -> Placement {
        let tile = config.world_to_tile(pos);
        let centre = config.tile_to_world(tile);

        if !config.in_bounds(centre) {
            return Placement::Rejected(Rejection::OutOfBounds);
        }
        if depot.overlaps(config.tile_extent(tile)) {
            return Placement::Rejected(Rejection::DepotZone);
        }
        if self.last_edit == Some(tile) {
            return Placement::Rejected(Rejection::Debounced);
        }
        self.last_edit = Some(tile);

        match self.index.get(&tile).copied() {
            Some(id) => {
                self.remove(id);
                Placement::Removed(id)
            }
            None => Placement::Placed(self.insert(tile, config, depot)),
        }
    }

    /// Forgets the previous edit, so the next placement is never debounced.
    pub fn end_gesture(&mut self) {
        self.last_edit = None;
    }

    /// Lays a track at the given grid cell, connecting it to its surroundings.
    /// An existing track at that cell is returned unchanged.
    pub(crate) fn insert(&mut self, tile: GridPos, config: &WorldConfig, depot: &Depot) -> TrackId {
        if let Some(id) = self.index.get(&tile) {
            return *id;
        }
        let pos = config.tile_to_world(tile);
        let id = self.tracks.insert_with_key(|id| Track::new(id, tile, pos));
        self.index.insert(tile, id);
        self.connect(id, config, depot);
        id
    }

    /// Connects a track to every other track within the adjacency radius,
    /// and tags it if it lies within reach of the depot.
    pub fn connect(&mut self, id: TrackId, config: &WorldConfig, depot: &Depot) {
        let Some(pos) = self.tracks.get(id).map(|t| t.pos()) else {
            return;
        };
        let radius = ADJACENCY_FACTOR * config.grid_size;
        let neighbours = self
            .tracks
            .values()
            .filter(|t| t.id() != id && distance(t.pos(), pos) <= radius)
            .map(|t| t.id())
            .collect::<Vec<_>>();

        for other in neighbours {
            self.tracks[id].add_neighbour(other);
            self.tracks[other].add_neighbour(id);
        }

        let depot_radius = DEPOT_RADIUS_FACTOR * config.grid_size;
        let connected = distance(pos, depot.position()) <= depot_radius;
        self.tracks[id].set_depot_connected(connected);
    }

    /// Removes a track, severing all of its connections.
    pub fn remove(&mut self, id: TrackId) -> Option<Track> {
        let mut track = self.tracks.remove(id)?;
        for other in track.neighbours().to_vec() {
            if let Some(other) = self.tracks.get_mut(other) {
                other.remove_neighbour(id);
            }
        }
        self.index.remove(&track.tile());
        track.set_depot_connected(false);
        Some(track)
    }

    /// Gets the track at the grid cell nearest to `pos`, if there is one.
    pub fn track_at(&self, pos: Point2d, config: &WorldConfig) -> Option<TrackId> {
        self.track_at_tile(config.world_to_tile(pos))
    }

    /// Gets the track at the given grid cell, if there is one.
    pub fn track_at_tile(&self, tile: GridPos) -> Option<TrackId> {
        self.index.get(&tile).copied()
    }

    /// Gets the track whose centre is exactly `pos`, if there is one.
    pub(crate) fn track_centred_at(&self, pos: Point2d, config: &WorldConfig) -> Option<TrackId> {
        self.track_at(pos, config)
            .filter(|id| self.tracks[*id].pos() == pos)
    }

    /// Gets a reference to the track with the given ID.
    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(id)
    }

    /// Whether a track with the given ID exists.
    pub fn contains(&self, id: TrackId) -> bool {
        self.tracks.contains_key(id)
    }

    /// Returns an iterator over all the tracks in the network.
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// The number of tracks in the network.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl std::ops::Index<TrackId> for TrackNetwork {
    type Output = Track;

    fn index(&self, id: TrackId) -> &Track {
        &self.tracks[id]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn setup() -> (WorldConfig, Depot, TrackNetwork) {
        let config = WorldConfig::default();
        let depot = Depot::new(&config.depot);
        (config, depot, TrackNetwork::new())
    }

    fn at(config: &WorldConfig, dx: f64, dy: f64) -> Point2d {
        let d = config.depot.position;
        Point2d::new(d.x + dx, d.y + dy)
    }

    fn assert_symmetric(network: &TrackNetwork) {
        for track in network.iter() {
            for n in track.neighbours() {
                assert!(network[*n].is_connected_to(track.id()));
            }
        }
    }

    #[test]
    fn connects_grid_neighbours_only() {
        let (config, depot, mut network) = setup();
        let Placement::Placed(a) = network.place(at(&config, 80.0, 0.0), &config, &depot) else {
            panic!("expected placement");
        };
        let Placement::Placed(b) = network.place(at(&config, 80.0, 40.0), &config, &depot) else {
            panic!("expected placement");
        };
        let Placement::Placed(c) = network.place(at(&config, 160.0, 0.0), &config, &depot) else {
            panic!("expected placement");
        };
        assert!(network[a].is_connected_to(b));
        assert!(!network[a].is_connected_to(c));
        assert!(!network[b].is_connected_to(c));
        assert_symmetric(&network);
    }

    #[test]
    fn tags_tracks_near_the_depot() {
        let (config, depot, mut network) = setup();
        network.place(at(&config, 120.0, 0.0), &config, &depot);
        network.place(at(&config, 160.0, 0.0), &config, &depot);
        let near = network.track_at(at(&config, 120.0, 0.0), &config).unwrap();
        let far = network.track_at(at(&config, 160.0, 0.0), &config).unwrap();
        assert!(network[near].is_depot_connected());
        assert!(!network[far].is_depot_connected());
    }

    #[test]
    fn rejects_depot_zone_and_out_of_bounds() {
        let (config, depot, mut network) = setup();
        assert_eq!(
            network.place(at(&config, 40.0, 0.0), &config, &depot),
            Placement::Rejected(Rejection::DepotZone)
        );
        assert_eq!(
            network.place(Point2d::new(-400.0, 0.0), &config, &depot),
            Placement::Rejected(Rejection::OutOfBounds)
        );
        assert!(network.is_empty());
    }

    #[test]
    fn toggles_and_debounces() {
        let (config, depot, mut network) = setup();
        let pos = at(&config, 200.0, 200.0);
        let Placement::Placed(id) = network.place(pos, &config, &depot) else {
            panic!("expected placement");
        };
        // Same cell, same gesture
        assert_eq!(
            network.place(pos, &config, &depot),
            Placement::Rejected(Rejection::Debounced)
        );
        network.end_gesture();
        assert_eq!(network.place(pos, &config, &depot), Placement::Removed(id));
        assert!(network.track_at(pos, &config).is_none());
    }

    #[test]
    fn removal_severs_connections() {
        let (config, depot, mut network) = setup();
        for dx in [200.0, 240.0, 280.0] {
            network.place(at(&config, dx, 0.0), &config, &depot);
        }
        let mid = network.track_at(at(&config, 240.0, 0.0), &config).unwrap();
        let removed = network.remove(mid).unwrap();
        assert_eq!(removed.neighbours().len(), 2);
        assert!(network.iter().all(|t| t.neighbours().is_empty()));
        assert!(network.track_at(at(&config, 240.0, 0.0), &config).is_none());
        assert_symmetric(&network);
    }
}
