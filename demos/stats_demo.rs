use std::hash::BuildHasher;

use clap::Parser;
use perturb_hash::DefaultHashBuilder;
use perturb_hash::HashTable;
use perturb_hash::hash_table::Entry;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Remove every n-th value after filling, leaving tombstones behind.
    #[arg(short = 'r', long = "remove_every", default_value_t = 0)]
    remove_every: usize,
}

fn main() {
    let args = Args::parse();
    let hasher = DefaultHashBuilder::default();

    println!(
        "Creating HashTable with target capacity: {}",
        args.target_capacity
    );

    let mut table: HashTable<u64> = HashTable::with_capacity(args.target_capacity);

    println!("Actual capacity: {}", table.capacity());
    println!("Filling table with u64 values...");

    // Stay just under the load limit so the table does not grow.
    let num_values = table.capacity() * 2 / 3 - 1;
    for i in 0..num_values {
        let value = i as u64;
        let hash = hasher.hash_one(value);

        match table.entry(hash, |&v| v == value) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(_) => {
                panic!("Value already exists in table: {}", value);
            }
        }
    }

    if args.remove_every > 0 {
        let mut removed = 0;
        for value in (0..num_values as u64).step_by(args.remove_every) {
            if table.remove(hasher.hash_one(value), |&v| v == value).is_some() {
                removed += 1;
            }
        }
        println!("Removed {} values", removed);
    }

    println!("Table holds {} values", table.len());
    println!(
        "Final load factor: {:.2}%",
        (table.fill() as f64 / table.capacity() as f64) * 100.0
    );

    table.probe_histogram().print();
    table.debug_stats().print();
}
