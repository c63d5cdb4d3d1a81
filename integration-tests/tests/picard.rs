use std::thread;

use approx::assert_relative_eq;
use integration_tests::surrogates::{Lattice, LumpedThermal, PinCell, PinCellTransport, Zone};
use uom::si::{f64::TemperatureInterval, temperature_interval::kelvin};
use weft_core::{ChannelGroup, ProcessGroup, SerialGroup, Thermal, Transport};
use weft_coupling::{Config, Coupling, Error, Norm, ROOT_RANK};

const MAX_ITERATIONS: usize = 50;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("weft_coupling=debug")
        .with_test_writer()
        .try_init();
}

/// Runs Picard iterations until the group agrees the temperature has
/// settled, returning the number of iterations taken.
fn picard<G: ProcessGroup>(
    coupling: &mut Coupling<PinCellTransport, LumpedThermal, G>,
) -> Result<Option<usize>, Error> {
    for iteration in 1..=MAX_ITERATIONS {
        let heat_source = coupling
            .transport()
            .heat_source(coupling.map().regions());
        coupling.set_heat_source(heat_source)?;
        coupling.push_heat_source()?;

        coupling.thermal_mut().solve();
        coupling.update_temperature()?;

        if coupling.is_converged()? {
            return Ok(Some(iteration));
        }
    }
    Ok(None)
}

fn coupling<G: ProcessGroup>(
    transport: PinCellTransport,
    group: G,
    config: &Config,
) -> Coupling<PinCellTransport, LumpedThermal, G> {
    let thermal = LumpedThermal::new(Lattice::two_by_two());
    Coupling::new(transport, thermal, group, config).unwrap()
}

#[test]
fn maps_every_pin_zone_and_level() {
    let lattice = Lattice::two_by_two();
    let coupling = coupling(
        PinCellTransport::new(lattice),
        SerialGroup,
        &Config::default(),
    );
    let map = coupling.map();

    // Four pins, four levels, and a fuel and clad cell in each.
    assert_eq!(map.region_count(), 32);
    assert_eq!(map.ring_count(), 4 * 4 * 4);
    assert_eq!(coupling.transport().tallies().len(), 32);

    let grid = map.grid();
    for pin in 0..4 {
        for level in 0..4 {
            for ring in 0..grid.ring_count() {
                let regions = map.ring_to_regions(grid.ring_index(pin, level, ring));
                let zone = if grid.is_fuel(ring) {
                    Zone::Fuel
                } else {
                    Zone::Clad
                };
                for &region in regions {
                    assert_eq!(map.regions()[region], PinCell { pin, level, zone });
                }
            }
        }
    }
}

#[test]
fn converges_on_a_single_process() {
    init_tracing();

    let mut coupling = coupling(
        PinCellTransport::new(Lattice::two_by_two()),
        SerialGroup,
        &Config::default(),
    );

    let iterations = picard(&mut coupling).unwrap();
    assert!(iterations.is_some_and(|n| n > 2));

    // At the fixed point the stored source matches what transport produces
    // at the temperatures it was last given.
    let transport = coupling.transport();
    let regions = coupling.map().regions();
    let fresh = transport.heat_source(regions);
    for (&stored, &now) in coupling.heat_source().iter().zip(fresh.iter()) {
        assert_relative_eq!(stored, now, epsilon = 1e-3);
    }

    for region in regions {
        let temperature = transport.temperature(region).unwrap();
        match region.zone {
            Zone::Fuel => assert!(temperature > coupling.thermal().coolant_temperature),
            Zone::Clad => assert_eq!(transport.power(region), 0.0),
        }
    }

    // Clad rings never receive heat.
    let source = coupling.thermal().source();
    assert!(source.slice(ndarray::s![.., .., 3]).iter().all(|&q| q == 0.0));
}

#[test]
fn stronger_feedback_takes_longer() {
    let weak = PinCellTransport::new(Lattice::two_by_two());
    let mut strong = PinCellTransport::new(Lattice::two_by_two());
    strong.doppler = 2e-3;

    let mut weak = coupling(weak, SerialGroup, &Config::default());
    let mut strong = coupling(strong, SerialGroup, &Config::default());

    let weak = picard(&mut weak).unwrap().unwrap();
    let strong = picard(&mut strong).unwrap().unwrap();

    assert!(strong > weak);
}

#[test]
fn ranks_leave_the_loop_together() {
    init_tracing();

    let handles = ChannelGroup::create(3);

    let iterations: Vec<Option<usize>> = thread::scope(|scope| {
        let workers: Vec<_> = handles
            .into_iter()
            .map(|group| {
                scope.spawn(move || {
                    let rank = group.rank();
                    let mut transport = PinCellTransport::new(Lattice::two_by_two());
                    let mut config = Config::default();

                    match rank {
                        ROOT_RANK => {}
                        // A follower that would stop immediately on its own.
                        1 => {
                            config =
                                config.with_tolerance(TemperatureInterval::new::<kelvin>(1e6));
                        }
                        // A follower without transport state sees no feedback.
                        _ => transport = transport.inactive(),
                    }

                    let mut coupling = coupling(transport, group, &config);
                    let n = picard(&mut coupling).unwrap();

                    if !coupling.transport().is_active() {
                        assert_eq!(coupling.region_count(), 0);
                        assert!(coupling.transport().tallies().is_empty());
                    }
                    n
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    let root = iterations[ROOT_RANK];
    assert!(root.is_some_and(|n| n > 1));
    assert!(iterations.iter().all(|&n| n == root));
}

#[test]
fn config_loads_from_toml() {
    let config: Config = toml::from_str(
        r#"
            azimuthal_sectors = 8
            norm = "l2"
            tolerance = 0.01
        "#,
    )
    .unwrap();

    assert_eq!(config.azimuthal_sectors, 8);
    assert_eq!(config.norm, Norm::L2);
    assert_relative_eq!(config.tolerance_kelvin(), 0.01);
    assert_relative_eq!(config.initial_temperature_kelvin(), 293.6);

    let mut coupling = coupling(
        PinCellTransport::new(Lattice::two_by_two()),
        SerialGroup,
        &config,
    );
    assert_eq!(coupling.map().sectors(), 8);
    assert!(picard(&mut coupling).unwrap().is_some());
}

#[test]
fn empty_toml_is_the_default_config() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn invalid_config_is_rejected_before_mapping() {
    let config: Config = toml::from_str("azimuthal_sectors = 0").unwrap();

    let result = Coupling::new(
        PinCellTransport::new(Lattice::two_by_two()),
        LumpedThermal::new(Lattice::two_by_two()),
        SerialGroup,
        &config,
    );

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn thermal_grid_shape_reaches_the_source_array() {
    let coupling = coupling(
        PinCellTransport::new(Lattice::two_by_two()),
        SerialGroup,
        &Config::default(),
    );
    let thermal = coupling.thermal();

    assert_eq!(thermal.source().dim(), (4, 4, 4));
    assert_eq!(thermal.temperature().len(), 64);
    assert_eq!(thermal.pin_center(3), [0.63, 0.63]);
}
