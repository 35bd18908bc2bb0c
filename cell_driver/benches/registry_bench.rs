//! Registry and allocator micro-benchmark.
//!
//! Measures:
//! - Handle allocation over a sparsely and a densely used range
//! - AT channel lookup in a registry of typical and full size
//! - Full add()/remove() cycle through the driver, simulation backend

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

use cell_common::module::ModuleType;
use cell_common::port::{AtClient, AtHandle};
use cell_driver::drivers::simulation::{SimAtClient, SimGpioPort};
use cell_driver::{
    CellDriver, CellHandle, CellInstance, HandleAllocator, HandleRange, InstanceRegistry,
    PinAssignment,
};

fn at(name: &str) -> AtHandle {
    let client: Arc<dyn AtClient> = Arc::new(SimAtClient::new(name));
    AtHandle::new(client)
}

fn registry_with(count: i32) -> (InstanceRegistry, Vec<AtHandle>) {
    let mut registry = InstanceRegistry::new();
    let mut channels = Vec::new();
    for i in 0..count {
        let ch = at(&format!("ch{i}"));
        registry.insert(CellInstance::new(
            CellHandle::from_raw(100 + i),
            ch.clone(),
            PinAssignment::default(),
            false,
            ModuleType::SaraR5.profile(),
        ));
        channels.push(ch);
    }
    (registry, channels)
}

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("handle_allocate");
    for used in [4, 99] {
        let (registry, _) = registry_with(used);
        let mut allocator = HandleAllocator::new(HandleRange::cellular());
        group.bench_with_input(BenchmarkId::from_parameter(used), &used, |b, _| {
            b.iter(|| allocator.allocate(|h| registry.contains(h)));
        });
    }
    group.finish();
}

fn bench_find_by_at_handle(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_by_at_handle");
    for count in [4, 100] {
        let (registry, channels) = registry_with(count);
        let last = channels.last().cloned().unwrap_or_else(|| at("none"));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| registry.find_by_at_handle(black_box(&last)).is_some());
        });
    }
    group.finish();
}

fn bench_add_remove(c: &mut Criterion) {
    let driver = CellDriver::new(SimGpioPort::new());
    driver.init().unwrap();
    let ch = at("bench");
    let pins = PinAssignment::from_raw(5, 26, 27);

    c.bench_function("driver_add_remove", |b| {
        b.iter(|| {
            let h = driver.add(ModuleType::SaraR5, &ch, pins, false).unwrap();
            driver.remove(black_box(h));
            driver.gpio().clear_journal();
        });
    });
}

criterion_group!(
    benches,
    bench_allocate,
    bench_find_by_at_handle,
    bench_add_remove
);
criterion_main!(benches);
