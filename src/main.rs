use rand::Rng;
use track_sim::Simulation;

const GRID: f64 = 40.0;

fn main() {
    let mut sim = Simulation::new();
    let depot = sim.depot().position();

    // A ring of track around the depot, with a few random spurs hanging off it.
    let ring = (-3..=3)
        .flat_map(|i| [(i, -3), (i, 3), (-3, i), (3, i)])
        .collect::<Vec<_>>();
    let mut rng = rand::thread_rng();
    let spurs = (0..4).flat_map(|_| {
        let x = rng.gen_range(-3..=3);
        let len = rng.gen_range(1..=4);
        (1..=len).map(move |i| (x, -3 - i))
    });
    for (x, y) in ring.into_iter().chain(spurs.collect::<Vec<_>>()) {
        sim.place_track(depot.x + x as f64 * GRID, depot.y + y as f64 * GRID);
        sim.end_gesture();
    }
    // Short branches joining the ring to the depot.
    for (x, y) in [(2, 0), (-2, 0), (0, 2), (0, -2)] {
        sim.place_track(depot.x + x as f64 * GRID, depot.y + y as f64 * GRID);
        sim.end_gesture();
    }
    for event in sim.take_events() {
        println!("{}", event);
    }

    println!("Simulating...");
    let num_frames = 1200;
    for frame in 0..num_frames {
        if frame % 40 == 0 {
            // Failures are reported as events.
            let _ = sim.spawn_vehicle();
        }
        sim.step(0.05);
        for event in sim.take_events() {
            println!("[{:>6.2}s] {}", sim.time(), event);
        }
    }
    println!(
        "{} trains still running after {:.0}s",
        sim.iter_vehicles().count(),
        sim.time()
    );
}
