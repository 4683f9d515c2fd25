//! Observable simulation events.
//!
//! Events are purely informational. Each one is written to the [log] facade
//! as it happens and buffered for the host application to drain with
//! [Simulation::take_events](crate::Simulation::take_events).

use crate::depot::SpawnError;
use crate::math::Point2d;
use crate::{TrackId, VehicleId};
use std::fmt;

/// Something noteworthy that happened during the simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    /// A track was laid.
    TrackPlaced { track: TrackId, pos: Point2d },
    /// A track was removed.
    TrackRemoved { track: TrackId, pos: Point2d },
    /// A vehicle left the depot along the given branch.
    Spawned { vehicle: VehicleId, branch: TrackId },
    /// No vehicle could be spawned.
    SpawnFailed(SpawnError),
    /// A vehicle reached a dead end and turned back.
    Reversed { vehicle: VehicleId, track: TrackId },
    /// A vehicle found its way blocked by another.
    Blocked {
        vehicle: VehicleId,
        track: TrackId,
        by: Option<VehicleId>,
    },
    /// A stopped vehicle started moving again.
    Resumed { vehicle: VehicleId },
    /// A vehicle gave up its outbound journey after waiting.
    TurnedBack { vehicle: VehicleId },
    /// A vehicle could not find any route to the depot.
    NoPath { vehicle: VehicleId, track: TrackId },
    /// A vehicle lost its track because the track was removed.
    Derailed { vehicle: VehicleId, track: TrackId },
    /// A vehicle has been away from any track for too long.
    OffTrack { vehicle: VehicleId, pos: Point2d },
    /// An off-track vehicle found its way back to a track.
    Recovered { vehicle: VehicleId, track: TrackId },
    /// A vehicle arrived back at the depot.
    ArrivedAtDepot { vehicle: VehicleId },
    /// A vehicle was removed from the simulation.
    Removed {
        vehicle: VehicleId,
        reason: RemovalReason,
    },
}

/// Why a vehicle left the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalReason {
    /// It finished its journey at the depot.
    Returned,
    /// It spent too long away from any track.
    Lost,
    /// It was removed by the host application.
    Discarded,
}

impl SimEvent {
    /// The log level the event is reported at.
    pub fn level(&self) -> log::Level {
        use SimEvent::*;
        match self {
            NoPath { .. } => log::Level::Error,
            SpawnFailed(_) | Reversed { .. } | Blocked { .. } | TurnedBack { .. } => {
                log::Level::Warn
            }
            Derailed { .. } | OffTrack { .. } => log::Level::Warn,
            _ => log::Level::Info,
        }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SimEvent::*;
        match self {
            TrackPlaced { pos, .. } => write!(f, "Track placed at ({}, {})", pos.x, pos.y),
            TrackRemoved { pos, .. } => write!(f, "Track removed at ({}, {})", pos.x, pos.y),
            Spawned { vehicle, branch } => {
                write!(f, "Train {:?} departed the depot via {:?}", vehicle, branch)
            }
            SpawnFailed(err) => write!(f, "Could not spawn train: {}", err),
            Reversed { vehicle, track } => {
                write!(f, "Train {:?} hit a dead end at {:?}, reversing", vehicle, track)
            }
            Blocked {
                vehicle,
                track,
                by: Some(by),
            } => write!(
                f,
                "Train {:?} stopped: {:?} is occupied by {:?}",
                vehicle, track, by
            ),
            Blocked { vehicle, track, .. } => {
                write!(f, "Train {:?} stopped: {:?} is occupied", vehicle, track)
            }
            Resumed { vehicle } => write!(f, "Train {:?} resumed", vehicle),
            TurnedBack { vehicle } => {
                write!(f, "Train {:?} gave up waiting and is returning", vehicle)
            }
            NoPath { vehicle, track } => {
                write!(f, "Train {:?} has no route to the depot from {:?}", vehicle, track)
            }
            Derailed { vehicle, track } => {
                write!(f, "Train {:?} lost its track {:?}", vehicle, track)
            }
            OffTrack { vehicle, pos } => {
                write!(f, "Train {:?} is off track at ({}, {})", vehicle, pos.x, pos.y)
            }
            Recovered { vehicle, track } => {
                write!(f, "Train {:?} is heading back onto {:?}", vehicle, track)
            }
            ArrivedAtDepot { vehicle } => write!(f, "Train {:?} arrived at the depot", vehicle),
            Removed { vehicle, reason } => {
                let reason = match reason {
                    RemovalReason::Returned => "journey complete",
                    RemovalReason::Lost => "lost off track",
                    RemovalReason::Discarded => "discarded",
                };
                write!(f, "Train {:?} removed ({})", vehicle, reason)
            }
        }
    }
}

/// Reports an event to the log and appends it to the buffer.
pub(crate) fn emit(events: &mut Vec<SimEvent>, event: SimEvent) {
    log::log!(event.level(), "{}", event);
    events.push(event);
}
