//! Benchmark suite for transitions and overlay layers
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench effects

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ons_benches::gradient;
use ons_fx::{
	Surface,
	blend::{self, BlendMode},
	effect::{EffectExecutor, EffectLink, Geometry, Role, Surfaces},
	layer::{FuruLayer, OldMovieLayer},
};
use std::hint::black_box;

const WIDTH: i32 = 640;
const HEIGHT: i32 = 480;

fn screen_surfaces() -> Surfaces {
	let mut surfaces = Surfaces::new(WIDTH, HEIGHT);
	*surfaces.get_mut(Role::Source) = gradient(WIDTH, HEIGHT);
	*surfaces.get_mut(Role::Destination) = Surface::filled(WIDTH, HEIGHT, 0xFFFF_FFFF);
	surfaces.dirty.fill();
	surfaces
}

/// Benchmark the blend kernels over a full screen
fn bench_blend(c: &mut Criterion) {
	let mut group = c.benchmark_group("blend");
	group.throughput(Throughput::Elements((WIDTH * HEIGHT) as u64));

	let a = gradient(WIDTH, HEIGHT);
	let b = Surface::filled(WIDTH, HEIGHT, 0xFF10_2030);
	let mask = gradient(64, 64);
	let mut dst = Surface::new(WIDTH, HEIGHT);
	let clip = dst.rect();

	group.bench_function("constant", |bench| {
		bench.iter(|| blend::alpha_blend(&a, &b, &mut dst, BlendMode::Constant, black_box(128), clip));
	});
	group.bench_function("fade_mask", |bench| {
		bench.iter(|| blend::alpha_blend(&a, &b, &mut dst, BlendMode::FadeMask(&mask), black_box(128), clip));
	});
	group.bench_function("crossfade_mask", |bench| {
		bench.iter(|| blend::alpha_blend(&a, &b, &mut dst, BlendMode::CrossfadeMask(&mask), black_box(128), clip));
	});

	group.finish();
}

/// Benchmark one midpoint frame of each transition family
fn bench_transition_frame(c: &mut Criterion) {
	let mut group = c.benchmark_group("transition_frame");
	let mut executor = EffectExecutor::new(Geometry::default()).with_seed(1);
	let mut surfaces = screen_surfaces();

	let links = [
		("shutter", EffectLink::new(2, 1000)),
		("curtain", EffectLink::new(6, 1000)),
		("crossfade", EffectLink::new(10, 1000)),
		("scroll", EffectLink::new(11, 1000)),
		("mosaic", EffectLink::new(16, 1000)),
		("quake", EffectLink::new(100, 1000).with_no(4)),
		("cascade", EffectLink::new(99, 1000).with_image("cascade.dll/ux")),
		("trvswave", EffectLink::new(99, 1000).with_image("trvswave.dll")),
		("whirl", EffectLink::new(99, 1000).with_image("whirl.dll")),
	];

	for (name, link) in &links {
		group.bench_with_input(BenchmarkId::new("midpoint", name), link, |b, link| {
			b.iter(|| executor.render_frame(link, black_box(500), &mut surfaces));
		});
	}

	group.finish();
}

/// Benchmark a full update/refresh cycle of each layer
fn bench_layers(c: &mut Criterion) {
	let mut group = c.benchmark_group("layer_frame");
	let picture = gradient(WIDTH, HEIGHT);

	let mut old_movie = OldMovieLayer::new(WIDTH, HEIGHT).with_seed(1);
	old_movie.message("s|3,24,24,400,0,-1");
	let mut surface = picture.clone();
	group.bench_function("old_movie", |b| {
		b.iter(|| {
			old_movie.update();
			old_movie.refresh(&mut surface, picture.rect());
		});
	});

	let mut furu = FuruLayer::new(WIDTH, HEIGHT, true).with_seed(1);
	furu.set_element(0, Surface::filled(64, 16, 0xFFFF_C0C0));
	furu.message("s|1,2,1,0,0");
	for _ in 0..HEIGHT {
		furu.update();
	}
	let mut surface = picture.clone();
	group.bench_function("furu", |b| {
		b.iter(|| {
			furu.update();
			furu.refresh(&mut surface, picture.rect());
		});
	});

	group.finish();
}

criterion_group!(benches, bench_blend, bench_transition_frame, bench_layers);
criterion_main!(benches);
