use crate::debug::debug_path;
use crate::depot::Depot;
use crate::math::{distance, manhattan};
use crate::network::TrackNetwork;
use crate::TrackId;

/// Costs are searched as integers in hundredths of a world unit.
const COST_SCALE: f64 = 100.0;

/// Finds a path from the given track to the nearest depot-connected track.
///
/// The path starts at `from` and ends at the first depot-connected track
/// reached, both inclusive; if `from` is itself depot-connected the path is
/// just `[from]`. Returns `None` if no depot-connected track can be reached.
///
/// Edges cost their Euclidean length and the heuristic is the Manhattan
/// distance to the depot, so the search favours short paths but is not
/// guaranteed to find the shortest one. Ties between equal-cost paths are
/// broken by search order.
pub fn find_path_to_depot(
    from: TrackId,
    network: &TrackNetwork,
    depot: &Depot,
) -> Option<Vec<TrackId>> {
    let start = network.get(from)?;
    if start.is_depot_connected() {
        return Some(vec![from]);
    }

    let goal = depot.position();
    let (path, _) = pathfinding::directed::astar::astar(
        &from,
        |id| successors(*id, network),
        |id| scaled(manhattan(network[*id].pos(), goal)),
        |id| network[*id].is_depot_connected(),
    )?;

    debug_path(
        "path to depot",
        &path.iter().map(|id| network[*id].pos()).collect::<Vec<_>>(),
    );
    Some(path)
}

fn successors(id: TrackId, network: &TrackNetwork) -> impl Iterator<Item = (TrackId, u64)> + '_ {
    let track = &network[id];
    track.neighbours().iter().map(move |n| {
        let cost = scaled(distance(track.pos(), network[*n].pos()));
        (*n, cost)
    })
}

fn scaled(dist: f64) -> u64 {
    (COST_SCALE * dist).round() as u64
}
