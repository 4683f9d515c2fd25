#[cfg(feature = "debug")]
use crate::debug::take_debug_frame;
use crate::config::{ConfigError, GridPos, WorldConfig};
use crate::depot::{Depot, SpawnError};
use crate::event::{emit, RemovalReason, SimEvent};
use crate::math::Point2d;
use crate::network::{Placement, TrackNetwork};
use crate::occupancy::Occupancy;
use crate::track::Track;
use crate::vehicle::pathfinding::find_path_to_depot;
use crate::vehicle::{StepContext, Vehicle};
use crate::{TrackId, VehicleId, VehicleSet};

/// A track simulation.
pub struct Simulation {
    /// The world geometry.
    config: WorldConfig,
    /// The tracks drawn by the player.
    network: TrackNetwork,
    /// The depot.
    depot: Depot,
    /// Which vehicle holds each grid cell.
    occupancy: Occupancy,
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    /// Events not yet collected by the host.
    events: Vec<SimEvent>,
    /// The current frame of simulation.
    frame: usize,
    /// The simulated time in s.
    time: f64,
    /// Debugging information from the previously simulated frame.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::from_valid_config(WorldConfig::default())
    }
}

impl Simulation {
    /// Creates a new simulation with the default world.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a new simulation of the given world.
    pub fn with_config(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: WorldConfig) -> Self {
        Self {
            depot: Depot::new(&config.depot),
            config,
            network: TrackNetwork::new(),
            occupancy: Occupancy::new(),
            vehicles: VehicleSet::with_key(),
            events: vec![],
            frame: 0,
            time: 0.0,
            #[cfg(feature = "debug")]
            debug: Default::default(),
        }
    }

    /// Toggles a track at the grid cell nearest to the given world position.
    ///
    /// Repeating the previous edit's cell is ignored until [Self::end_gesture]
    /// is called, so a drag does not flicker tracks on and off.
    pub fn place_track(&mut self, x: f64, y: f64) -> Placement {
        let pos = Point2d::new(x, y);
        let placement = self.network.place(pos, &self.config, &self.depot);
        match placement {
            Placement::Placed(track) => {
                let pos = self.network[track].pos();
                emit(&mut self.events, SimEvent::TrackPlaced { track, pos });
            }
            Placement::Removed(track) => {
                let tile = self.config.world_to_tile(pos);
                self.after_track_removed(track, tile);
            }
            Placement::Rejected(_) => {}
        }
        placement
    }

    /// Ends the current placement gesture.
    pub fn end_gesture(&mut self) {
        self.network.end_gesture();
    }

    /// Removes a track from the network.
    pub fn remove_track(&mut self, track: TrackId) -> Option<Track> {
        let removed = self.network.remove(track)?;
        self.after_track_removed(track, removed.tile());
        Some(removed)
    }

    /// Frees the removed track's cell and redirects the vehicles using it.
    fn after_track_removed(&mut self, track: TrackId, tile: GridPos) {
        let pos = self.config.tile_to_world(tile);
        emit(&mut self.events, SimEvent::TrackRemoved { track, pos });

        let mut ctx = StepContext {
            config: &self.config,
            network: &self.network,
            depot: &self.depot,
            occupancy: &mut self.occupancy,
            events: &mut self.events,
        };
        for vehicle in self.vehicles.values_mut() {
            vehicle.on_track_removed(track, tile, &mut ctx);
        }
        ctx.occupancy.release(tile);
    }

    /// Spawns a vehicle at the depot, departing along the next free branch.
    pub fn spawn_vehicle(&mut self) -> Result<VehicleId, SpawnError> {
        let branch = match self.depot.next_branch(&self.network, &self.occupancy) {
            Ok(branch) => branch,
            Err(err) => {
                emit(&mut self.events, SimEvent::SpawnFailed(err));
                return Err(err);
            }
        };

        let depot = self.depot.position();
        let vehicle = self
            .vehicles
            .insert_with_key(|id| Vehicle::new(id, depot, branch));
        emit(&mut self.events, SimEvent::Spawned { vehicle, branch });
        Ok(vehicle)
    }

    /// Removes a vehicle from the simulation, releasing everything it holds.
    pub fn remove_vehicle(&mut self, vehicle: VehicleId) -> Option<Vehicle> {
        self.remove_with_reason(vehicle, RemovalReason::Discarded)
    }

    /// Removes every vehicle from the simulation.
    pub fn clear_vehicles(&mut self) {
        let ids = self.vehicles.keys().collect::<Vec<_>>();
        for id in ids {
            self.remove_with_reason(id, RemovalReason::Discarded);
        }
    }

    fn remove_with_reason(&mut self, vehicle: VehicleId, reason: RemovalReason) -> Option<Vehicle> {
        let removed = self.vehicles.remove(vehicle)?;
        self.occupancy.release_all(vehicle);
        emit(&mut self.events, SimEvent::Removed { vehicle, reason });
        Some(removed)
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Returns the vehicles that left the simulation during the step.
    pub fn step(&mut self, dt: f64) -> Vec<VehicleId> {
        let mut ctx = StepContext {
            config: &self.config,
            network: &self.network,
            depot: &self.depot,
            occupancy: &mut self.occupancy,
            events: &mut self.events,
        };
        for vehicle in self.vehicles.values_mut() {
            vehicle.step(dt, &mut ctx);
        }

        let finished = self
            .vehicles
            .values()
            .filter_map(|v| {
                if v.is_home(&self.depot) {
                    Some((v.id(), RemovalReason::Returned))
                } else if v.is_lost() {
                    Some((v.id(), RemovalReason::Lost))
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();
        for (id, reason) in &finished {
            self.remove_with_reason(*id, *reason);
        }

        self.frame += 1;
        self.time += dt;

        #[cfg(feature = "debug")]
        {
            self.debug = take_debug_frame();
        }

        finished.into_iter().map(|(id, _)| id).collect()
    }

    /// Takes the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Finds a path from the given track to the depot. See [find_path_to_depot].
    pub fn find_path_to_depot(&self, track: TrackId) -> Option<Vec<TrackId>> {
        find_path_to_depot(track, &self.network, &self.depot)
    }

    /// Gets the track at the grid cell nearest to the given world position.
    pub fn track_at(&self, x: f64, y: f64) -> Option<TrackId> {
        self.network.track_at(Point2d::new(x, y), &self.config)
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Gets the simulated time in s.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Returns an iterator over all the tracks in the simulation.
    pub fn iter_tracks(&self) -> impl Iterator<Item = &Track> {
        self.network.iter()
    }

    /// Returns an iterator over all the vehicles in the simulation.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Gets a reference to the track with the given ID.
    pub fn get_track(&self, track: TrackId) -> Option<&Track> {
        self.network.get(track)
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, vehicle: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(vehicle)
    }

    pub fn network(&self) -> &TrackNetwork {
        &self.network
    }

    pub fn depot(&self) -> &Depot {
        &self.depot
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Gets the debugging information for the previously simulated frame as JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&mut self) -> serde_json::Value {
        self.debug.clone()
    }
}
