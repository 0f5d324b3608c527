use std::env;
use std::error::Error;

use geodesic_exact::geodesic_exact::{GeodesicExact, GeodesicExactParams};
use geodesic_exact::geodesic_mask::GeodesicMask;
use geodesic_exact::polygon_area::PolygonArea;

/// Print `n` equally spaced waypoints along the shortest geodesic between two points.
///
/// Arguments
/// -----------------
/// * `geod`: The engine to use.
/// * `from`, `to`: End points as `(lat, lon)` in degrees.
/// * `n`: Number of intervals.
///
/// Return
/// ----------
/// * `Err(GeodesicError)` only if the engine runs in strict mode and the inverse fails.
fn print_waypoints(
    geod: &GeodesicExact,
    from: (f64, f64),
    to: (f64, f64),
    n: usize,
) -> Result<(), Box<dyn Error>> {
    let line = geod.inverse_line(from.0, from.1, to.0, to.1, GeodesicMask::STANDARD)?;
    println!(
        "distance = {:.3} km, initial azimuth = {:.6}°",
        line.distance() / 1e3,
        line.azimuth()
    );
    for i in 0..=n {
        let p = line.position(line.distance() * i as f64 / n as f64, GeodesicMask::STANDARD)?;
        println!("  {i:>3}  lat = {:>12.6}  lon = {:>12.6}  azi = {:>12.6}", p.lat2, p.lon2, p.azi2);
    }
    Ok(())
}

/// Minimal driver: inverse problem, waypoints and a small polygon.
/// Usage:
///   geodesic_demo [LAT1 LON1 LAT2 LON2] [--verbose]
/// Example:
///   geodesic_demo -41.32 174.81 40.96 -5.50 --verbose
fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1).collect::<Vec<_>>();
    let verbose = if let Some(pos) = args.iter().position(|a| a == "--verbose") {
        args.remove(pos);
        true
    } else {
        false
    };

    // New York to Singapore by default
    let coords = if args.len() == 4 {
        args.iter()
            .map(|a| a.parse::<f64>())
            .collect::<Result<Vec<_>, _>>()?
    } else {
        vec![40.6, -73.8, 1.4, 104.0]
    };
    let (from, to) = ((coords[0], coords[1]), (coords[2], coords[3]));

    let params = GeodesicExactParams::builder()
        .strict_convergence(true)
        .build()?;
    let geod = GeodesicExact::with_params(6_378_137.0, 1.0 / 298.257_223_563, params)?;
    if verbose {
        eprintln!("{geod}");
        eprintln!("{}", geod.params());
    }

    let sol = geod.inverse(from.0, from.1, to.0, to.1)?;
    println!(
        "({}, {}) -> ({}, {}): s12 = {:.3} m, azi1 = {:.9}°, azi2 = {:.9}°",
        from.0, from.1, to.0, to.1, sol.s12, sol.azi1, sol.azi2
    );
    if verbose {
        eprintln!("{sol}");
    }

    print_waypoints(&geod, from, to, 10)?;

    let back = geod.direct(from.0, from.1, sol.azi1, sol.s12);
    println!(
        "direct check: lat2 = {:.12}, lon2 = {:.12}",
        back.lat2, back.lon2
    );

    let mut poly = PolygonArea::new(&geod, false);
    for (lat, lon) in [(89.0, 0.0), (89.0, 90.0), (89.0, 180.0), (89.0, 270.0)] {
        poly.add_point(lat, lon)?;
    }
    println!("polar cap: {}", poly.compute(false, true)?);

    Ok(())
}
