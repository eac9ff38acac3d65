//! Criterion benchmarks for the smeltery engine.
//!
//! Three benchmark groups:
//! - `tick_math`: `adjust` and `compose_burn` over a spread of levels
//! - `regions`: persist-and-evict then reload of a region of 256 furnaces
//! - `events`: one smelt notification plus the following tick, per furnace

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use smeltery_core::config::SmelteryConfig;
use smeltery_core::controller::Controller;
use smeltery_core::id::*;
use smeltery_core::test_utils::*;
use smeltery_core::ticks::{adjust, compose_burn, Fraction};

// ===========================================================================
// Builders
// ===========================================================================

/// One furnace per block of a 16x16 region, cycling through levels.
fn build_region(ctl: &mut Controller, world: &mut MockWorld) -> Vec<Location> {
    let mut placed = Vec::with_capacity(256);
    for x in 0..16 {
        for z in 0..16 {
            let at = loc(x, z);
            let level = (x + z) % 5 - 2;
            let block = world.add(at);
            block.slots.input = ore_slot(32);
            block.burn_time = 1600;
            ctl.on_entity_placed(at, &furnace_item(level, level + 3, 2, level > 0));
            placed.push(at);
        }
    }
    placed
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_tick_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_math");
    let fraction = Fraction::ONE_FIFTH;

    group.bench_function("adjust", |b| {
        b.iter(|| {
            for level in -10..=10 {
                black_box(adjust(black_box(1600), level, fraction));
            }
        });
    });

    group.bench_function("compose_burn", |b| {
        b.iter(|| {
            for level in -10..=10 {
                black_box(compose_burn(
                    black_box(1600),
                    level,
                    -level,
                    Fraction::ONE_FIFTH,
                    Fraction::ONE_HALF,
                ));
            }
        });
    });

    group.finish();
}

fn bench_regions(c: &mut Criterion) {
    let mut group = c.benchmark_group("regions");
    let mut ctl = controller(vec![]);
    let mut world = MockWorld::new();
    build_region(&mut ctl, &mut world);
    let region = loc(0, 0).region();

    group.bench_function("unload_then_load_256", |b| {
        b.iter(|| {
            black_box(ctl.on_region_unload(region));
            black_box(ctl.on_region_load(region));
        });
    });

    group.finish();
}

fn bench_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("events");
    let mut ctl = Controller::new(
        SmelteryConfig::default(),
        Box::new(recipe_book()),
        Box::new(effect_table()),
    );
    let mut world = MockWorld::new();
    let placed = build_region(&mut ctl, &mut world);
    let proposed = ingot_stack(1);

    group.bench_function("smelt_and_tick_256", |b| {
        b.iter(|| {
            for &at in &placed {
                black_box(ctl.on_smelt_complete(&mut world, at, ore_source(), &proposed));
            }
            ctl.run_tick(&mut world);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_tick_math, bench_regions, bench_events);
criterion_main!(benches);
