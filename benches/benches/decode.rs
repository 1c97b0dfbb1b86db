//! Benchmark suite for the asset decoders
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench decode

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ons_benches::{generate_test_lzss, generate_test_spb, sizes};
use ons_types::file::{KeyTable, lzss, nbz, spb};
use std::hint::black_box;

/// Benchmark SPB decoding at several image sizes
fn bench_spb_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("spb_decode");
	let key = KeyTable::identity();

	for (name, (width, height)) in [
		("tiny", sizes::TINY),
		("small", sizes::SMALL),
		("screen", sizes::SCREEN),
		("wide", sizes::WIDE),
	] {
		let data = generate_test_spb(width, height);
		group.throughput(Throughput::Elements(width as u64 * height as u64));
		group.bench_with_input(BenchmarkId::new("decode", name), &data, |b, data| {
			b.iter(|| black_box(spb::decode(&mut black_box(data).as_slice(), &key)));
		});
	}

	group.finish();
}

/// Benchmark SPB decoding through a keyed table
fn bench_spb_keyed(c: &mut Criterion) {
	let (width, height) = sizes::SCREEN;
	let table: [u8; 256] = std::array::from_fn(|i| i as u8);
	let key = KeyTable::new(table);
	let data = generate_test_spb(width, height);

	c.bench_function("spb_decode_keyed_screen", |b| {
		b.iter(|| black_box(spb::decode(&mut black_box(&data).as_slice(), &key)));
	});
}

/// Benchmark LZSS decoding at several output lengths
fn bench_lzss_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("lzss_decode");
	let key = KeyTable::identity();

	for length in [4 * 1024, 64 * 1024, 1024 * 1024] {
		let data = generate_test_lzss(length);
		group.throughput(Throughput::Bytes(length as u64));
		group.bench_with_input(BenchmarkId::from_parameter(length), &data, |b, data| {
			b.iter(|| black_box(lzss::decode(black_box(&data[..]), &key, length)));
		});
	}

	group.finish();
}

/// Benchmark NBZ decoding of a decoded screen-sized bitmap
fn bench_nbz_decode(c: &mut Criterion) {
	let key = KeyTable::identity();
	let (width, height) = sizes::SCREEN;
	let Ok(bitmap) = spb::decode(&mut generate_test_spb(width, height).as_slice(), &key) else {
		eprintln!("Warning: could not build NBZ fixture");
		return;
	};
	let mut data = Vec::new();
	if nbz::encode(&mut data, &bitmap).is_err() {
		eprintln!("Warning: could not build NBZ fixture");
		return;
	}

	let mut group = c.benchmark_group("nbz_decode");
	group.throughput(Throughput::Bytes(bitmap.len() as u64));
	group.bench_function("screen", |b| {
		b.iter(|| black_box(nbz::decode(&mut black_box(&data).as_slice(), &key)));
	});
	group.finish();
}

criterion_group!(benches, bench_spb_decode, bench_spb_keyed, bench_lzss_decode, bench_nbz_decode);
criterion_main!(benches);
