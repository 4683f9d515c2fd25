pub use cgmath;
pub use config::{ConfigError, DepotConfig, GridPos, WorldConfig};
pub use depot::{Depot, SpawnError};
pub use event::{RemovalReason, SimEvent};
pub use network::{Placement, Rejection, TrackNetwork};
pub use occupancy::Occupancy;
pub use simulation::Simulation;
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use track::{Track, TrackKind};
pub use util::Interval;
pub use vehicle::pathfinding::find_path_to_depot;
pub use vehicle::{Direction, Heading, Vehicle, VehicleState};

mod config;
mod debug;
mod depot;
mod event;
pub mod math;
mod network;
mod occupancy;
mod simulation;
mod track;
mod util;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Track].
    pub struct TrackId;
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

type TrackSet = SlotMap<TrackId, Track>;
type VehicleSet = SlotMap<VehicleId, Vehicle>;
