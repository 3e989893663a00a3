//! Criterion benchmarks comparing redtree against other ordered maps.
//!
//! This benchmark suite compares:
//! - `redtree::TreeMap` - Red-black tree with navigation and range views
//! - `crossbeam_skiplist::SkipMap` - Lock-free skip list
//! - `std::collections::BTreeMap` - Standard library B-tree
//!
//! All benchmarks are single-threaded. Navigation queries on `BTreeMap` are
//! expressed through `range`, which is how callers reach floor and ceiling
//! there.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use crossbeam_skiplist::SkipMap;
use rand::{rngs::StdRng, Rng, SeedableRng};
use redtree::TreeMap;
use std::collections::BTreeMap;
use std::hint::black_box;
use std::ops::Bound;

const SEED: u64 = 42;

// ============================================================================
// Helper Functions
// ============================================================================

/// Generate sequential keys from 0 to count-1
fn sequential_keys(count: usize) -> Vec<i64> {
	(0..count as i64).collect()
}

/// Generate random keys using a seeded RNG
fn random_keys(count: usize) -> Vec<i64> {
	let mut rng = StdRng::seed_from_u64(SEED);
	(0..count).map(|_| rng.random()).collect()
}

/// Generate lookup keys that fall between the even keys of a populated map
fn odd_queries(count: usize) -> Vec<i64> {
	let mut rng = StdRng::seed_from_u64(SEED);
	(0..1000).map(|_| rng.random_range(0..count as i64) * 2 + 1).collect()
}

struct Populated {
	redtree: TreeMap<i64, i64>,
	skipmap: SkipMap<i64, i64>,
	btreemap: BTreeMap<i64, i64>,
}

fn populate(keys: &[i64]) -> Populated {
	let mut redtree = TreeMap::new();
	let skipmap = SkipMap::new();
	let mut btreemap = BTreeMap::new();
	redtree.extend(keys.iter().map(|&k| (k, k)));
	for &k in keys {
		skipmap.insert(k, k);
		btreemap.insert(k, k);
	}
	Populated {
		redtree,
		skipmap,
		btreemap,
	}
}

// ============================================================================
// Insert Benchmarks
// ============================================================================

fn bench_insert(c: &mut Criterion, name: &str, keys_for: fn(usize) -> Vec<i64>) {
	let mut group = c.benchmark_group(name);

	for count in [1_000, 10_000, 100_000] {
		let keys = keys_for(count);
		group.throughput(Throughput::Elements(count as u64));

		// redtree
		group.bench_with_input(BenchmarkId::new("redtree", count), &keys, |b, keys| {
			b.iter_batched(
				TreeMap::new,
				|mut map| {
					for &k in keys {
						black_box(map.put(k, k).ok());
					}
					map
				},
				BatchSize::SmallInput,
			)
		});

		// SkipMap
		group.bench_with_input(BenchmarkId::new("skipmap", count), &keys, |b, keys| {
			b.iter_batched(
				SkipMap::new,
				|map| {
					for &k in keys {
						black_box(map.insert(k, k));
					}
					map
				},
				BatchSize::SmallInput,
			)
		});

		// BTreeMap
		group.bench_with_input(BenchmarkId::new("btreemap", count), &keys, |b, keys| {
			b.iter_batched(
				BTreeMap::new,
				|mut map| {
					for &k in keys {
						black_box(map.insert(k, k));
					}
					map
				},
				BatchSize::SmallInput,
			)
		});
	}
	group.finish();
}

fn bench_insert_sequential(c: &mut Criterion) {
	bench_insert(c, "insert_sequential", sequential_keys);
}

fn bench_insert_random(c: &mut Criterion) {
	bench_insert(c, "insert_random", random_keys);
}

// ============================================================================
// Lookup Benchmarks
// ============================================================================

fn bench_lookup(c: &mut Criterion) {
	let mut group = c.benchmark_group("lookup");

	for count in [1_000, 10_000, 100_000] {
		let keys = random_keys(count);
		let maps = populate(&keys);
		let lookup_keys: Vec<i64> = keys.iter().step_by((count / 1000).max(1)).copied().collect();

		group.throughput(Throughput::Elements(lookup_keys.len() as u64));

		// redtree
		group.bench_with_input(BenchmarkId::new("redtree", count), &lookup_keys, |b, keys| {
			b.iter(|| {
				for k in keys {
					black_box(maps.redtree.get(k));
				}
			})
		});

		// SkipMap
		group.bench_with_input(BenchmarkId::new("skipmap", count), &lookup_keys, |b, keys| {
			b.iter(|| {
				for k in keys {
					black_box(maps.skipmap.get(k).map(|e| *e.value()));
				}
			})
		});

		// BTreeMap
		group.bench_with_input(BenchmarkId::new("btreemap", count), &lookup_keys, |b, keys| {
			b.iter(|| {
				for k in keys {
					black_box(maps.btreemap.get(k));
				}
			})
		});
	}
	group.finish();
}

// ============================================================================
// Remove Benchmarks
// ============================================================================

fn bench_remove(c: &mut Criterion) {
	let mut group = c.benchmark_group("remove");

	for count in [1_000, 10_000, 100_000] {
		let keys = random_keys(count);
		group.throughput(Throughput::Elements(count as u64));

		// redtree
		group.bench_with_input(BenchmarkId::new("redtree", count), &keys, |b, keys| {
			b.iter_batched(
				|| populate(keys).redtree,
				|mut map| {
					for k in keys {
						black_box(map.remove(k).ok());
					}
					map
				},
				BatchSize::LargeInput,
			)
		});

		// SkipMap
		group.bench_with_input(BenchmarkId::new("skipmap", count), &keys, |b, keys| {
			b.iter_batched(
				|| populate(keys).skipmap,
				|map| {
					for k in keys {
						black_box(map.remove(k).is_some());
					}
					map
				},
				BatchSize::LargeInput,
			)
		});

		// BTreeMap
		group.bench_with_input(BenchmarkId::new("btreemap", count), &keys, |b, keys| {
			b.iter_batched(
				|| populate(keys).btreemap,
				|mut map| {
					for k in keys {
						black_box(map.remove(k));
					}
					map
				},
				BatchSize::LargeInput,
			)
		});
	}
	group.finish();
}

// ============================================================================
// Navigation Benchmarks
// ============================================================================

fn bench_floor_ceiling(c: &mut Criterion) {
	let mut group = c.benchmark_group("floor_ceiling");

	for count in [1_000, 10_000, 100_000] {
		// Even keys only, queried with odd keys so no query lands on a stored key.
		let keys: Vec<i64> = (0..count as i64).map(|k| k * 2).collect();
		let maps = populate(&keys);
		let queries = odd_queries(count);

		group.throughput(Throughput::Elements(queries.len() as u64 * 2));

		// redtree
		group.bench_with_input(BenchmarkId::new("redtree", count), &queries, |b, queries| {
			b.iter(|| {
				for p in queries {
					black_box(maps.redtree.floor_key(p));
					black_box(maps.redtree.ceiling_key(p));
				}
			})
		});

		// SkipMap
		group.bench_with_input(BenchmarkId::new("skipmap", count), &queries, |b, queries| {
			b.iter(|| {
				for p in queries {
					black_box(maps.skipmap.upper_bound(Bound::Included(p)).map(|e| *e.key()));
					black_box(maps.skipmap.lower_bound(Bound::Included(p)).map(|e| *e.key()));
				}
			})
		});

		// BTreeMap
		group.bench_with_input(BenchmarkId::new("btreemap", count), &queries, |b, queries| {
			b.iter(|| {
				for p in queries {
					black_box(maps.btreemap.range(..=p).next_back());
					black_box(maps.btreemap.range(p..).next());
				}
			})
		});
	}
	group.finish();
}

// ============================================================================
// Range and Iteration Benchmarks
// ============================================================================

fn bench_range(c: &mut Criterion) {
	let mut group = c.benchmark_group("range");

	for count in [1_000, 10_000, 100_000] {
		let keys = sequential_keys(count);
		let maps = populate(&keys);

		// Range covers 10% of entries in the middle
		let range_size = count / 10;
		let start = (count / 2 - range_size / 2) as i64;
		let end = start + range_size as i64;

		group.throughput(Throughput::Elements(range_size as u64));

		// redtree
		group.bench_function(BenchmarkId::new("redtree", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				if let Ok(view) = maps.redtree.sub_map(start, true, end, false) {
					for (k, v) in view.iter() {
						sum = sum.wrapping_add(*k).wrapping_add(*v);
					}
				}
				black_box(sum)
			})
		});

		// redtree, read backwards through a descending view
		group.bench_function(BenchmarkId::new("redtree_descending", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				if let Ok(view) = maps.redtree.sub_map(start, true, end, false) {
					for (k, v) in view.descending_map().iter() {
						sum = sum.wrapping_add(*k).wrapping_add(*v);
					}
				}
				black_box(sum)
			})
		});

		// SkipMap
		group.bench_function(BenchmarkId::new("skipmap", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				for entry in maps.skipmap.range(start..end) {
					sum = sum.wrapping_add(*entry.key()).wrapping_add(*entry.value());
				}
				black_box(sum)
			})
		});

		// BTreeMap
		group.bench_function(BenchmarkId::new("btreemap", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				for (&k, &v) in maps.btreemap.range(start..end) {
					sum = sum.wrapping_add(k).wrapping_add(v);
				}
				black_box(sum)
			})
		});
	}
	group.finish();
}

fn bench_iter(c: &mut Criterion) {
	let mut group = c.benchmark_group("iterator");

	for count in [1_000, 10_000, 100_000] {
		let keys = sequential_keys(count);
		let maps = populate(&keys);

		group.throughput(Throughput::Elements(count as u64));

		// redtree
		group.bench_function(BenchmarkId::new("redtree", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				for (k, v) in maps.redtree.iter() {
					sum = sum.wrapping_add(*k).wrapping_add(*v);
				}
				black_box(sum)
			})
		});

		// SkipMap
		group.bench_function(BenchmarkId::new("skipmap", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				for entry in maps.skipmap.iter() {
					sum = sum.wrapping_add(*entry.key()).wrapping_add(*entry.value());
				}
				black_box(sum)
			})
		});

		// BTreeMap
		group.bench_function(BenchmarkId::new("btreemap", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				for (&k, &v) in maps.btreemap.iter() {
					sum = sum.wrapping_add(k).wrapping_add(v);
				}
				black_box(sum)
			})
		});
	}
	group.finish();
}

// ============================================================================
// Removal During Iteration
// ============================================================================

fn bench_cursor_remove(c: &mut Criterion) {
	let mut group = c.benchmark_group("remove_while_iterating");

	for count in [1_000, 10_000, 100_000] {
		let keys = sequential_keys(count);
		group.throughput(Throughput::Elements(count as u64));

		// redtree cursor
		group.bench_with_input(BenchmarkId::new("redtree", count), &keys, |b, keys| {
			b.iter_batched(
				|| populate(keys).redtree,
				|mut map| {
					let mut cursor = map.cursor();
					while let Ok((k, _)) = cursor.next(&map) {
						if k % 3 == 0 {
							black_box(cursor.remove(&mut map).ok());
						}
					}
					map
				},
				BatchSize::LargeInput,
			)
		});

		// BTreeMap retain
		group.bench_with_input(BenchmarkId::new("btreemap", count), &keys, |b, keys| {
			b.iter_batched(
				|| populate(keys).btreemap,
				|mut map| {
					map.retain(|k, _| k % 3 != 0);
					map
				},
				BatchSize::LargeInput,
			)
		});
	}
	group.finish();
}

criterion_group!(
	benches,
	bench_insert_sequential,
	bench_insert_random,
	bench_lookup,
	bench_remove,
	bench_floor_ceiling,
	bench_range,
	bench_iter,
	bench_cursor_remove
);

criterion_main!(benches);
