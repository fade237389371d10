use core::hash::Hash;
use core::hash::Hasher;
use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashSet as HashbrownHashSet;
use hashbrown::hash_table::Entry as HashbrownEntry;
use hashbrown::hash_table::HashTable as HashbrownHashTable;
use perturb_hash::HashSet as PerturbHashSet;
use perturb_hash::HashTable as PerturbHashTable;
use perturb_hash::OrderedSet;
use perturb_hash::hash_table::Entry as PerturbEntry;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
    (1 << 18),
];

fn sip(key: &String) -> u64 {
    let mut hasher = SipHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

fn string_keys(count: usize) -> Vec<(u64, String)> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| {
            let key = format!("key_{:016X}", rng.try_next_u64().unwrap());
            (sip(&key), key)
        })
        .collect()
}

fn bench_add_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_random_u64");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = OsRng;
    for &size in SIZES {
        let keys = (0..size)
            .map(|_| rng.try_next_u64().unwrap())
            .collect::<Vec<u64>>();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("perturb_hash/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut set = PerturbHashSet::<u64>::new();
                    for key in keys {
                        black_box(set.add(key));
                    }
                    black_box(set)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut set = HashbrownHashSet::<u64>::new();
                    for key in keys {
                        black_box(set.insert(key));
                    }
                    black_box(set)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_contains_hit_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("contains_hit_miss_u64");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let present = 0..size as u64;
        let probes = (0..size as u64 * 2).collect::<Vec<u64>>();

        let perturb: PerturbHashSet<u64> = present.clone().collect();
        let hashbrown: HashbrownHashSet<u64> = present.collect();

        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("perturb_hash/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(perturb.contains(key));
                }
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(hashbrown.contains(key));
                }
            })
        });
    }

    group.finish();
}

#[derive(Clone, Copy)]
enum Operation {
    Find,
    Insert,
    Remove,
}

/// Mixed find/insert/remove traffic over Zipf-distributed string keys on the
/// raw tables. Removals leave tombstones, so this also measures how quickly
/// the table recovers through rebuilds.
fn bench_churn_zipf(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn_zipf_string");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    const KEY_SPACE_MULTIPLIER: usize = 2;

    for &size in SIZES {
        let keys = string_keys(size * KEY_SPACE_MULTIPLIER);
        let distr = Zipf::new(keys.len() as f32 - 1.0, 1.0).unwrap();

        let mut rng = SmallRng::from_os_rng();
        let mut operations = (0..size * 3)
            .map(|i| {
                let op = match i % 4 {
                    0 | 1 => Operation::Find,
                    2 => Operation::Insert,
                    _ => Operation::Remove,
                };
                (op, rng.sample(distr) as usize)
            })
            .collect::<Vec<(Operation, usize)>>();
        operations.shuffle(&mut rng);

        group.throughput(Throughput::Elements(operations.len() as u64));
        group.bench_function(format!("perturb_hash/{size}"), |b| {
            b.iter_batched(
                || operations.clone(),
                |operations| {
                    let mut table = PerturbHashTable::<String>::with_capacity(0);
                    for (operation, index) in operations {
                        let (hash, key) = &keys[index];
                        match operation {
                            Operation::Insert => match table.entry(*hash, |v| v == key) {
                                PerturbEntry::Vacant(entry) => {
                                    black_box(entry.insert(key.clone()));
                                }
                                PerturbEntry::Occupied(entry) => {
                                    black_box(entry.get());
                                }
                            },
                            Operation::Remove => {
                                black_box(table.remove(*hash, |v| v == key));
                            }
                            Operation::Find => {
                                black_box(table.find(*hash, |v| v == key));
                            }
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || operations.clone(),
                |operations| {
                    let mut table = HashbrownHashTable::<String>::with_capacity(0);
                    for (operation, index) in operations {
                        let (hash, key) = &keys[index];
                        match operation {
                            Operation::Insert => match table.entry(*hash, |v| v == key, sip) {
                                HashbrownEntry::Vacant(entry) => {
                                    black_box(entry.insert(key.clone()));
                                }
                                HashbrownEntry::Occupied(entry) => {
                                    black_box(entry.get());
                                }
                            },
                            Operation::Remove => {
                                let result = match table.find_entry(*hash, |v| v == key) {
                                    Ok(entry) => Some(entry.remove().0),
                                    Err(_) => None,
                                };
                                black_box(result);
                            }
                            Operation::Find => {
                                black_box(table.find(*hash, |v| v == key));
                            }
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("iteration_u64");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let hashed: PerturbHashSet<u64> = (0..size as u64).collect();
        let mut ordered: OrderedSet<u64> = (0..size as u64).collect();
        // Leave holes in the arrival vector.
        for key in (0..size as u64).step_by(3) {
            ordered.discard(&key);
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("hash_set/{size}"), |b| {
            b.iter(|| black_box(hashed.iter().copied().sum::<u64>()))
        });
        group.bench_function(format!("ordered_set/{size}"), |b| {
            b.iter(|| black_box(ordered.iter().copied().sum::<u64>()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_add_random,
    bench_contains_hit_miss,
    bench_churn_zipf,
    bench_iteration,
);

criterion_main!(benches);
