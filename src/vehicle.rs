use self::motion::MoveTimer;
use self::pathfinding::find_path_to_depot;
use crate::config::{GridPos, WorldConfig};
use crate::debug::debug_point;
use crate::depot::Depot;
use crate::event::{emit, SimEvent};
use crate::math::{distance, Point2d};
use crate::network::TrackNetwork;
use crate::occupancy::Occupancy;
use crate::{TrackId, VehicleId};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod motion;
pub(crate) mod pathfinding;

/// The time taken to move between logical positions, in s.
const MOVE_INTERVAL: f64 = 1.0;

/// The time a new vehicle waits at the depot before departing, in s.
const SPAWN_DELAY: f64 = 0.5;

/// The time a blocked vehicle waits before deciding what to do, in s.
const STOP_WAIT: f64 = 2.0;

/// The time a vehicle may spend away from any track before it is considered off track, in s.
const OFF_TRACK_GRACE: f64 = 0.5;

/// The time a vehicle may spend away from any track before it is abandoned, in s.
const OFF_TRACK_EXPIRY: f64 = 10.0;

/// A simulated train.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vehicle {
    /// The vehicle's ID.
    id: VehicleId,
    /// The authoritative position of the vehicle.
    pos: Point2d,
    /// Where the vehicle is drawn. Never feeds back into the simulation.
    visual_pos: Point2d,
    /// Whether the vehicle is heading out or coming home.
    direction: Direction,
    /// The behavioural state.
    state: VehicleState,
    /// Where the vehicle is moving next.
    heading: Heading,
    /// The track the vehicle is on, or `None` if it is at the depot or lost.
    current: Option<TrackId>,
    /// The track the vehicle was on before the current one.
    came_from: Option<TrackId>,
    /// The outbound target the vehicle stopped short of.
    blocked: Option<TrackId>,
    /// Time left before the vehicle departs the depot, in s.
    spawn_delay: f64,
    /// Time spent stopped, in s.
    stop_timer: f64,
    /// Time continuously spent away from any track or the depot, in s.
    off_track_timer: f64,
    /// Progress through the current move.
    motion: MoveTimer,
}

/// The direction of travel of a vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Exploring the network away from the depot.
    Outbound,
    /// Heading back to the depot.
    Returning,
}

/// The behavioural state of a vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VehicleState {
    Moving,
    /// Waiting for a blocked track to clear.
    Stopped,
    /// Lost, looking for a way back onto the network.
    OffTrack,
}

/// Where a vehicle is moving next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Heading {
    /// Towards a track.
    Track(TrackId),
    /// Straight to the depot.
    Depot,
    /// Nowhere; the vehicle holds its position.
    Hold,
}

/// The shared simulation state a vehicle reads and updates while stepping.
pub(crate) struct StepContext<'a> {
    pub config: &'a WorldConfig,
    pub network: &'a TrackNetwork,
    pub depot: &'a Depot,
    pub occupancy: &'a mut Occupancy,
    pub events: &'a mut Vec<SimEvent>,
}

impl StepContext<'_> {
    fn tile_of(&self, track: TrackId) -> Option<GridPos> {
        self.network.get(track).map(|t| t.tile())
    }

    fn is_taken(&self, track: TrackId, vehicle: VehicleId) -> bool {
        self.tile_of(track)
            .map_or(false, |tile| self.occupancy.is_occupied_by_other(tile, vehicle))
    }

    fn emit(&mut self, event: SimEvent) {
        emit(self.events, event);
    }
}

impl Vehicle {
    /// Creates a vehicle waiting at the depot to depart along `branch`.
    pub(crate) fn new(id: VehicleId, depot: Point2d, branch: TrackId) -> Self {
        Self {
            id,
            pos: depot,
            visual_pos: depot,
            direction: Direction::Outbound,
            state: VehicleState::Moving,
            heading: Heading::Track(branch),
            current: None,
            came_from: None,
            blocked: None,
            spawn_delay: SPAWN_DELAY,
            stop_timer: 0.0,
            off_track_timer: 0.0,
            motion: MoveTimer::new(MOVE_INTERVAL),
        }
    }

    /// Creates a vehicle stranded away from the network, trying to get home.
    #[cfg(test)]
    pub(crate) fn stranded(id: VehicleId, pos: Point2d) -> Self {
        Self {
            pos,
            visual_pos: pos,
            direction: Direction::Returning,
            heading: Heading::Hold,
            spawn_delay: 0.0,
            ..Self::new(id, pos, TrackId::default())
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The authoritative position of the vehicle.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// The eased position the vehicle should be drawn at.
    pub fn visual_position(&self) -> Point2d {
        self.visual_pos
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> VehicleState {
        self.state
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// The track the vehicle is on, if any.
    pub fn current_track(&self) -> Option<TrackId> {
        self.current
    }

    /// The track the vehicle was on before the current one.
    pub fn came_from(&self) -> Option<TrackId> {
        self.came_from
    }

    /// Whether the vehicle is still waiting to depart the depot.
    pub fn is_departing(&self) -> bool {
        self.spawn_delay > 0.0
    }

    /// Whether the vehicle is resting at the depot.
    pub fn is_at_depot(&self, depot: &Depot) -> bool {
        self.current.is_none() && self.pos == depot.position()
    }

    /// Whether the vehicle has completed its journey.
    pub(crate) fn is_home(&self, depot: &Depot) -> bool {
        self.direction == Direction::Returning && self.is_at_depot(depot)
    }

    /// Whether the vehicle has been away from any track for too long.
    pub(crate) fn is_lost(&self) -> bool {
        self.off_track_timer >= OFF_TRACK_EXPIRY
    }

    /// Advances the vehicle by `dt` seconds.
    pub(crate) fn step(&mut self, dt: f64, ctx: &mut StepContext) {
        if self.spawn_delay > 0.0 {
            self.spawn_delay = f64::max(self.spawn_delay - dt, 0.0);
            return;
        }

        self.check_off_track(dt, ctx);

        match self.state {
            VehicleState::Moving => {}
            VehicleState::Stopped => {
                self.stop_timer += dt;
                if self.stop_timer < STOP_WAIT {
                    return;
                }
                self.resume(ctx);
            }
            VehicleState::OffTrack => self.recover(ctx),
        }

        if self.state == VehicleState::Moving {
            self.advance(dt, ctx);
        }
    }

    /// Tracks how long the vehicle has spent away from any track,
    /// flagging it as off track once the grace period runs out.
    /// A vehicle already heading straight for the depot is left to get there.
    fn check_off_track(&mut self, dt: f64, ctx: &mut StepContext) {
        let on_track = self.pos == ctx.depot.position()
            || ctx.network.track_centred_at(self.pos, ctx.config).is_some();
        if on_track {
            self.off_track_timer = 0.0;
            return;
        }

        let before = self.off_track_timer;
        self.off_track_timer += dt;
        if self.heading == Heading::Depot {
            return;
        }
        if before < OFF_TRACK_GRACE && self.off_track_timer >= OFF_TRACK_GRACE {
            self.state = VehicleState::OffTrack;
            ctx.emit(SimEvent::OffTrack {
                vehicle: self.id,
                pos: self.pos,
            });
        }
    }

    /// Heads for the nearest free track, or home if there is none.
    fn recover(&mut self, ctx: &mut StepContext) {
        let nearest = ctx
            .network
            .iter()
            .filter(|t| !ctx.occupancy.is_occupied_by_other(t.tile(), self.id))
            .min_by(|a, b| {
                distance(a.pos(), self.pos).total_cmp(&distance(b.pos(), self.pos))
            })
            .map(|t| (t.id(), t.pos()));

        match nearest {
            Some((track, pos)) => {
                debug_point("recovery target", pos);
                self.heading = Heading::Track(track);
                ctx.emit(SimEvent::Recovered {
                    vehicle: self.id,
                    track,
                });
            }
            None => {
                self.direction = Direction::Returning;
                self.heading = Heading::Depot;
            }
        }
        self.motion.reset();
        self.state = VehicleState::Moving;
    }

    /// Starts moving again after waiting at a blocked track.
    fn resume(&mut self, ctx: &mut StepContext) {
        self.state = VehicleState::Moving;
        self.stop_timer = 0.0;
        ctx.emit(SimEvent::Resumed { vehicle: self.id });

        if let Some(track) = self.blocked.take() {
            if ctx.network.contains(track) && !ctx.is_taken(track, self.id) {
                self.heading = Heading::Track(track);
                return;
            }
        }
        if self.direction == Direction::Outbound {
            self.direction = Direction::Returning;
            ctx.emit(SimEvent::TurnedBack { vehicle: self.id });
        }
        self.choose_next(ctx);
    }

    /// Eases the visual position towards the target and performs a logical
    /// move each time the move interval elapses.
    fn advance(&mut self, dt: f64, ctx: &mut StepContext) {
        let target = match self.heading {
            Heading::Track(id) => match ctx.network.get(id) {
                Some(track) => track.pos(),
                None => {
                    self.heading = Heading::Hold;
                    self.pos
                }
            },
            Heading::Depot => ctx.depot.position(),
            Heading::Hold => self.pos,
        };

        let done = self.motion.tick(dt);
        self.visual_pos = self.motion.sample(self.pos, target);
        if !done {
            return;
        }

        self.visual_pos = target;
        if target == self.pos {
            // Stalled; try to find a way on.
            if self.heading == Heading::Hold && self.current.is_some() {
                self.choose_next(ctx);
            }
            return;
        }
        self.pos = target;
        self.arrive(ctx);
    }

    /// Updates the vehicle's track and occupancy after a logical move,
    /// then decides where to go next.
    fn arrive(&mut self, ctx: &mut StepContext) {
        let departed = self.current;

        match self.heading {
            Heading::Track(id) if ctx.network.get(id).map(|t| t.pos()) == Some(self.pos) => {
                // Claim the new cell before giving up the old one.
                let tile = ctx.network[id].tile();
                ctx.occupancy.claim(tile, self.id);
                if let Some(old) = departed.filter(|old| *old != id) {
                    self.release(old, ctx);
                }
                self.came_from = departed;
                self.current = Some(id);
            }
            _ => {
                if let Some(old) = departed {
                    self.release(old, ctx);
                }
                self.came_from = departed;
                self.current = None;
                self.heading = Heading::Hold;
                if self.pos == ctx.depot.position() {
                    ctx.emit(SimEvent::ArrivedAtDepot { vehicle: self.id });
                }
                return;
            }
        }

        self.choose_next(ctx);
    }

    /// Releases the vehicle's claim on a track's cell.
    fn release(&self, track: TrackId, ctx: &mut StepContext) {
        if let Some(tile) = ctx.tile_of(track) {
            if ctx.occupancy.owner(tile) == Some(self.id) {
                ctx.occupancy.release(tile);
            }
        }
    }

    /// Picks the vehicle's next target from its current track.
    fn choose_next(&mut self, ctx: &mut StepContext) {
        let Some(current) = self.current.filter(|id| ctx.network.contains(*id)) else {
            return;
        };

        let next = match self.direction {
            Direction::Outbound => {
                let onward = ctx.network[current]
                    .neighbours()
                    .iter()
                    .copied()
                    .find(|n| Some(*n) != self.came_from);
                match onward {
                    Some(track) => Heading::Track(track),
                    None => {
                        self.direction = Direction::Returning;
                        ctx.emit(SimEvent::Reversed {
                            vehicle: self.id,
                            track: current,
                        });
                        match self.came_from.filter(|id| ctx.network.contains(*id)) {
                            Some(back) => Heading::Track(back),
                            None => self.route_home(current, ctx),
                        }
                    }
                }
            }
            Direction::Returning => self.route_home(current, ctx),
        };

        self.set_heading(next, ctx);
    }

    /// Picks the next step on the way back to the depot.
    fn route_home(&self, current: TrackId, ctx: &mut StepContext) -> Heading {
        let Some(path) = find_path_to_depot(current, ctx.network, ctx.depot) else {
            ctx.emit(SimEvent::NoPath {
                vehicle: self.id,
                track: current,
            });
            return Heading::Hold;
        };
        if path.len() == 1 {
            return Heading::Depot;
        }

        // Every step being taken means the next one is blocked; head for it
        // regardless and let the collision check stop us.
        let next = path[1..]
            .iter()
            .copied()
            .find(|id| !ctx.is_taken(*id, self.id))
            .unwrap_or(path[1]);
        Heading::Track(next)
    }

    /// Adopts the next target, unless another vehicle holds it.
    fn set_heading(&mut self, next: Heading, ctx: &mut StepContext) {
        if let Heading::Track(track) = next {
            if ctx.is_taken(track, self.id) {
                let by = ctx.tile_of(track).and_then(|tile| ctx.occupancy.owner(tile));
                self.state = VehicleState::Stopped;
                self.stop_timer = 0.0;
                self.heading = Heading::Hold;
                self.motion.reset();
                self.blocked = (self.direction == Direction::Outbound).then_some(track);
                ctx.emit(SimEvent::Blocked {
                    vehicle: self.id,
                    track,
                    by,
                });
                return;
            }
        }
        self.heading = next;
    }

    /// Reacts to the removal of a track.
    /// Returns `true` if the vehicle was on or heading for the track.
    pub(crate) fn on_track_removed(
        &mut self,
        track: TrackId,
        tile: GridPos,
        ctx: &mut StepContext,
    ) -> bool {
        if self.came_from == Some(track) {
            self.came_from = None;
        }
        if self.blocked == Some(track) {
            self.blocked = None;
        }

        let on_track = self.current == Some(track);
        if !on_track && self.heading != Heading::Track(track) {
            return false;
        }

        self.direction = Direction::Returning;
        self.motion.reset();
        if on_track {
            if ctx.occupancy.owner(tile) == Some(self.id) {
                ctx.occupancy.release(tile);
            }
            self.current = None;
            self.heading = Heading::Depot;
            self.state = VehicleState::Moving;
        } else {
            self.heading = Heading::Hold;
            self.state = if self.off_track_timer >= OFF_TRACK_GRACE {
                VehicleState::OffTrack
            } else {
                VehicleState::Moving
            };
        }
        ctx.emit(SimEvent::Derailed {
            vehicle: self.id,
            track,
        });

        // Still on a track: re-route from here straight away.
        self.choose_next(ctx);
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use slotmap::SlotMap;

    struct World {
        config: WorldConfig,
        depot: Depot,
        network: TrackNetwork,
        occupancy: Occupancy,
        events: Vec<SimEvent>,
    }

    impl World {
        fn new(offsets: &[(f64, f64)]) -> Self {
            let config = WorldConfig::default();
            let depot = Depot::new(&config.depot);
            let mut network = TrackNetwork::new();
            for (dx, dy) in offsets {
                let tile = config.world_to_tile(at(&config, *dx, *dy));
                network.insert(tile, &config, &depot);
            }
            Self {
                config,
                depot,
                network,
                occupancy: Occupancy::new(),
                events: vec![],
            }
        }

        fn track(&self, dx: f64, dy: f64) -> TrackId {
            self.network
                .track_at(at(&self.config, dx, dy), &self.config)
                .unwrap()
        }

        fn step(&mut self, vehicle: &mut Vehicle, dt: f64) {
            let mut ctx = StepContext {
                config: &self.config,
                network: &self.network,
                depot: &self.depot,
                occupancy: &mut self.occupancy,
                events: &mut self.events,
            };
            vehicle.step(dt, &mut ctx);
        }
    }

    fn at(config: &WorldConfig, dx: f64, dy: f64) -> Point2d {
        let d = config.depot.position;
        Point2d::new(d.x + dx, d.y + dy)
    }

    fn vehicle_ids() -> SlotMap<VehicleId, ()> {
        SlotMap::with_key()
    }

    #[test]
    fn waits_out_the_spawn_delay() {
        let mut world = World::new(&[(80.0, 0.0)]);
        let branch = world.track(80.0, 0.0);
        let id = vehicle_ids().insert(());
        let mut vehicle = Vehicle::new(id, world.depot.position(), branch);

        world.step(&mut vehicle, 0.25);
        world.step(&mut vehicle, 0.25);
        assert!(!vehicle.is_departing());
        assert_eq!(vehicle.visual_position(), world.depot.position());

        world.step(&mut vehicle, 0.5);
        let visual = vehicle.visual_position();
        assert!(visual.x > world.depot.position().x);
        assert!(visual.x < world.network[branch].pos().x);
        assert_eq!(vehicle.position(), world.depot.position());

        world.step(&mut vehicle, 0.5);
        assert_eq!(vehicle.position(), world.network[branch].pos());
        assert_eq!(vehicle.current_track(), Some(branch));
        assert_eq!(world.occupancy.owner(world.network[branch].tile()), Some(id));
    }

    #[test]
    fn dead_end_reverses_to_came_from() {
        let mut world = World::new(&[(80.0, 0.0), (120.0, 0.0)]);
        let branch = world.track(80.0, 0.0);
        let end = world.track(120.0, 0.0);
        let id = vehicle_ids().insert(());
        let mut vehicle = Vehicle::new(id, world.depot.position(), branch);

        world.step(&mut vehicle, 0.5);
        world.step(&mut vehicle, 1.0);
        assert_eq!(vehicle.heading(), Heading::Track(end));
        assert_eq!(vehicle.direction(), Direction::Outbound);

        world.step(&mut vehicle, 1.0);
        assert_eq!(vehicle.current_track(), Some(end));
        assert_eq!(vehicle.came_from(), Some(branch));
        assert_eq!(vehicle.direction(), Direction::Returning);
        assert_eq!(vehicle.heading(), Heading::Track(branch));
        assert!(world
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::Reversed { track, .. } if *track == end)));

        // Back onto the branch, then home.
        world.step(&mut vehicle, 1.0);
        assert_eq!(vehicle.heading(), Heading::Depot);
        assert!(!world.occupancy.is_occupied(world.network[end].tile()));
        world.step(&mut vehicle, 1.0);
        assert!(vehicle.is_home(&world.depot));
        assert!(world.occupancy.is_empty());
    }

    #[test]
    fn blocked_vehicle_stops_then_turns_back() {
        let mut world = World::new(&[(80.0, 0.0), (120.0, 0.0), (160.0, 0.0)]);
        let branch = world.track(80.0, 0.0);
        let mid = world.track(120.0, 0.0);
        let mut ids = vehicle_ids();
        let id = ids.insert(());
        let other = ids.insert(());
        world.occupancy.claim(world.network[mid].tile(), other);

        let mut vehicle = Vehicle::new(id, world.depot.position(), branch);
        world.step(&mut vehicle, 0.5);
        world.step(&mut vehicle, 1.0);
        assert_eq!(vehicle.state(), VehicleState::Stopped);
        assert_eq!(vehicle.heading(), Heading::Hold);

        for _ in 0..7 {
            world.step(&mut vehicle, 0.25);
            assert_eq!(vehicle.state(), VehicleState::Stopped);
        }
        world.step(&mut vehicle, 0.25);
        // Still blocked: give up and head home from the depot-connected branch.
        assert_eq!(vehicle.state(), VehicleState::Moving);
        assert_eq!(vehicle.direction(), Direction::Returning);
        assert_eq!(vehicle.heading(), Heading::Depot);
    }

    #[test]
    fn blocked_vehicle_resumes_when_track_clears() {
        let mut world = World::new(&[(80.0, 0.0), (120.0, 0.0), (160.0, 0.0)]);
        let branch = world.track(80.0, 0.0);
        let mid = world.track(120.0, 0.0);
        let mut ids = vehicle_ids();
        let id = ids.insert(());
        let other = ids.insert(());
        world.occupancy.claim(world.network[mid].tile(), other);

        let mut vehicle = Vehicle::new(id, world.depot.position(), branch);
        world.step(&mut vehicle, 0.5);
        world.step(&mut vehicle, 1.0);
        assert_eq!(vehicle.state(), VehicleState::Stopped);

        world.occupancy.release(world.network[mid].tile());
        world.step(&mut vehicle, 1.75);
        assert_eq!(vehicle.state(), VehicleState::Stopped);
        world.step(&mut vehicle, 0.25);
        assert_eq!(vehicle.state(), VehicleState::Moving);
        assert_eq!(vehicle.direction(), Direction::Outbound);
        assert_eq!(vehicle.heading(), Heading::Track(mid));
    }

    #[test]
    fn goes_off_track_after_grace_and_is_lost_after_expiry() {
        let mut world = World::new(&[]);
        let id = vehicle_ids().insert(());
        let mut vehicle = Vehicle::new(id, world.depot.position(), TrackId::default());
        vehicle.spawn_delay = 0.0;
        vehicle.pos = at(&world.config, 400.0, 400.0);

        let mut ctx = StepContext {
            config: &world.config,
            network: &world.network,
            depot: &world.depot,
            occupancy: &mut world.occupancy,
            events: &mut world.events,
        };
        vehicle.check_off_track(0.25, &mut ctx);
        assert_eq!(vehicle.state(), VehicleState::Moving);
        vehicle.check_off_track(0.25, &mut ctx);
        assert_eq!(vehicle.state(), VehicleState::OffTrack);

        for _ in 0..37 {
            vehicle.check_off_track(0.25, &mut ctx);
        }
        assert!(!vehicle.is_lost());
        vehicle.check_off_track(0.25, &mut ctx);
        assert!(vehicle.is_lost());
    }

    #[test]
    fn off_track_vehicle_heads_for_nearest_free_track() {
        let mut world = World::new(&[(200.0, 0.0), (400.0, 0.0)]);
        let near = world.track(200.0, 0.0);
        let far = world.track(400.0, 0.0);
        let mut ids = vehicle_ids();
        let id = ids.insert(());
        let mut vehicle = Vehicle::new(id, world.depot.position(), near);
        vehicle.spawn_delay = 0.0;
        vehicle.heading = Heading::Hold;
        vehicle.direction = Direction::Returning;
        vehicle.pos = at(&world.config, 240.0, 40.0);

        world.occupancy.claim(world.network[near].tile(), ids.insert(()));
        world.step(&mut vehicle, 0.25);
        world.step(&mut vehicle, 0.25);
        assert_eq!(vehicle.state(), VehicleState::Moving);
        assert_eq!(vehicle.heading(), Heading::Track(far));

        // The recovery move takes a full move interval.
        world.step(&mut vehicle, 0.5);
        assert_eq!(vehicle.current_track(), None);
        let visual = vehicle.visual_position();
        assert!(visual.x > vehicle.position().x);
        assert!(visual.x < world.network[far].pos().x);

        world.step(&mut vehicle, 0.25);
        assert_eq!(vehicle.current_track(), Some(far));
        world.step(&mut vehicle, 0.25);
        assert_eq!(vehicle.off_track_timer, 0.0);
    }

    #[test]
    fn losing_the_current_track_heads_straight_home() {
        let mut world = World::new(&[(80.0, 0.0), (120.0, 0.0)]);
        let branch = world.track(80.0, 0.0);
        let id = vehicle_ids().insert(());
        let mut vehicle = Vehicle::new(id, world.depot.position(), branch);
        world.step(&mut vehicle, 0.5);
        world.step(&mut vehicle, 1.0);
        assert_eq!(vehicle.current_track(), Some(branch));

        let tile = world.network[branch].tile();
        world.network.remove(branch);
        let mut ctx = StepContext {
            config: &world.config,
            network: &world.network,
            depot: &world.depot,
            occupancy: &mut world.occupancy,
            events: &mut world.events,
        };
        assert!(vehicle.on_track_removed(branch, tile, &mut ctx));
        assert_eq!(vehicle.current_track(), None);
        assert_eq!(vehicle.direction(), Direction::Returning);
        assert_eq!(vehicle.heading(), Heading::Depot);
        assert!(world.occupancy.is_empty());

        for _ in 0..3 {
            world.step(&mut vehicle, 0.25);
            assert_eq!(vehicle.state(), VehicleState::Moving);
        }
        world.step(&mut vehicle, 0.25);
        assert!(vehicle.is_home(&world.depot));
        assert!(!world
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::OffTrack { .. })));
    }

    #[test]
    fn off_track_with_no_free_track_heads_home() {
        let mut world = World::new(&[]);
        let id = vehicle_ids().insert(());
        let mut vehicle = Vehicle::new(id, world.depot.position(), TrackId::default());
        vehicle.spawn_delay = 0.0;
        vehicle.heading = Heading::Hold;
        vehicle.pos = at(&world.config, 400.0, 400.0);

        world.step(&mut vehicle, 0.5);
        assert_eq!(vehicle.heading(), Heading::Depot);
        assert_eq!(vehicle.direction(), Direction::Returning);
        world.step(&mut vehicle, 0.5);
        assert!(vehicle.is_home(&world.depot));
    }
}
