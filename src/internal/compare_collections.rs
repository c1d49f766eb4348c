#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_docs_in_private_items)]

//! Times the chained containers against `std::collections` and optionally
//! renders the timings as a bar chart.

use std::{
    collections::{HashMap, HashSet},
    hint::black_box,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use chaintable::{Associative, ChainedHashMap, ChainedHashSet, Collection};
use clap::Parser;
use plotters::prelude::*;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

#[derive(Parser, Debug)]
#[command(
    name = "compare_collections",
    about = "Benchmark chained hash containers against std::collections",
    version
)]
struct Cli {
    /// Number of distinct keys driven through every operation
    #[arg(long, default_value_t = 100_000)]
    elements: u64,
    /// Seed for the key shuffle
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Render the timings to this PNG file
    #[arg(long)]
    chart: Option<PathBuf>,
}

const SEPARATOR: &str = "-------------------------------------------------";

/// Elapsed milliseconds for one operation on both implementations
#[derive(Debug, Clone)]
struct Timing {
    operation: String,
    custom_ms: f64,
    std_ms: f64,
}

/// Runs `op` once and prints how long it took
fn measure<R>(name: &str, op: impl FnOnce() -> R) -> (R, f64) {
    let start = Instant::now();
    let result = op();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;
    println!("{name} took {elapsed_ms:.3} ms");
    (result, elapsed_ms)
}

fn time_map<M: Associative<u64, String>>(label: &str, map: &mut M, keys: &[u64]) -> Vec<f64> {
    let n = keys.len();
    let mut timings = Vec::with_capacity(4);

    let ((), ms) = measure(&format!("{label} put {n} entries"), || {
        for &key in keys {
            black_box(map.put(key, format!("Value{key}")));
        }
    });
    timings.push(ms);

    let ((), ms) = measure(&format!("{label} get {n} entries"), || {
        for key in keys {
            black_box(map.get(key));
        }
    });
    timings.push(ms);

    let ((), ms) = measure(&format!("{label} containsKey {n} entries"), || {
        for key in keys {
            black_box(map.contains_key(key));
        }
    });
    timings.push(ms);

    let ((), ms) = measure(&format!("{label} remove {n} entries"), || {
        for key in keys {
            black_box(map.remove(key));
        }
    });
    timings.push(ms);

    timings
}

fn time_set<C: Collection<u64>>(label: &str, set: &mut C, keys: &[u64]) -> Vec<f64> {
    let n = keys.len();
    let mut timings = Vec::with_capacity(3);

    let ((), ms) = measure(&format!("{label} add {n} elements"), || {
        for &key in keys {
            black_box(set.add(key));
        }
    });
    timings.push(ms);

    let ((), ms) = measure(&format!("{label} contains {n} elements"), || {
        for key in keys {
            black_box(set.contains(key));
        }
    });
    timings.push(ms);

    let ((), ms) = measure(&format!("{label} remove {n} elements"), || {
        for key in keys {
            black_box(set.remove(key));
        }
    });
    timings.push(ms);

    timings
}

fn pair_up(operations: &[&str], custom: &[f64], std: &[f64]) -> Vec<Timing> {
    operations
        .iter()
        .zip(custom.iter().zip(std))
        .map(|(operation, (&custom_ms, &std_ms))| Timing {
            operation: (*operation).to_string(),
            custom_ms,
            std_ms,
        })
        .collect()
}

fn benchmark_maps(keys: &[u64]) -> Vec<Timing> {
    println!("== Maps ==");
    let mut custom: ChainedHashMap<u64, String> = ChainedHashMap::new();
    let mut std_map: HashMap<u64, String> = HashMap::new();

    // Warm the custom map once to report its shape after all insertions
    for &key in keys {
        custom.put(key, String::new());
    }
    let stats = custom.stats();
    println!(
        "ChainedHashMap shape: {} entries, {} buckets, {} empty, largest chain {}, load factor {:.2}",
        stats.len, stats.buckets, stats.empty_buckets, stats.largest_chain, stats.load_factor
    );
    custom.clear();

    let custom_ms = time_map("ChainedHashMap", &mut custom, keys);
    let std_ms = time_map("std HashMap", &mut std_map, keys);
    pair_up(&["map put", "map get", "map containsKey", "map remove"], &custom_ms, &std_ms)
}

fn benchmark_sets(keys: &[u64]) -> Vec<Timing> {
    println!("== Sets ==");
    let mut custom: ChainedHashSet<u64> = ChainedHashSet::new();
    let mut std_set: HashSet<u64> = HashSet::new();

    let custom_ms = time_set("ChainedHashSet", &mut custom, keys);
    let std_ms = time_set("std HashSet", &mut std_set, keys);
    pair_up(&["set add", "set contains", "set remove"], &custom_ms, &std_ms)
}

/// Closing lines reporting the whole run in milliseconds and in seconds
fn total_report(total: Duration) -> [String; 2] {
    [
        format!("Total benchmarking time: {} ms", total.as_millis()),
        format!("Total benchmarking time: {:.3} s", total.as_secs_f64()),
    ]
}

fn draw_chart(path: &Path, timings: &[Timing]) -> Result<(), Box<dyn std::error::Error>> {
    let font_family = "sans-serif";
    let colors = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];
    let text_size = 16;
    let title_size = 35;

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_ms = timings
        .iter()
        .flat_map(|timing| [timing.custom_ms, timing.std_ms])
        .fold(0.0, f64::max) *
        1.1; // Add 10% margin

    // Every operation gets three slots on the x axis: custom, std, gap
    let slots = timings.len() * 3;
    let mut chart = ChartBuilder::on(&root)
        .caption("Chained containers vs std::collections", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..slots, 0.0..max_ms.max(f64::EPSILON))?;

    let labels: Vec<String> = timings.iter().map(|timing| timing.operation.clone()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(slots)
        .x_label_formatter(&|x| {
            if x % 3 == 0 && x / 3 < labels.len() { labels[x / 3].clone() } else { String::new() }
        })
        .x_desc("Operation")
        .y_desc("Elapsed time (ms)")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    let series: [(&str, fn(&Timing) -> f64); 2] =
        [("chaintable", |timing| timing.custom_ms), ("std", |timing| timing.std_ms)];
    for (offset, (name, value)) in series.into_iter().enumerate() {
        let style = colors[offset].filled();
        chart
            .draw_series(timings.iter().enumerate().map(|(i, timing)| {
                let x = i * 3 + offset;
                Rectangle::new([(x, 0.0), (x + 1, value(timing))], style)
            }))?
            .label(name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let start = Instant::now();

    let mut keys: Vec<u64> = (0..cli.elements).collect();
    let mut rng = StdRng::seed_from_u64(cli.seed);
    keys.shuffle(&mut rng);
    println!("Benchmarking {} keys (seed {})", keys.len(), cli.seed);

    println!("{SEPARATOR}");
    let mut timings = benchmark_maps(&keys);
    println!("{SEPARATOR}");
    timings.extend(benchmark_sets(&keys));
    println!("{SEPARATOR}");

    for line in total_report(start.elapsed()) {
        println!("{line}");
    }

    if let Some(path) = cli.chart {
        draw_chart(&path, &timings)?;
        println!("Generated plot image: {}", path.display());
    }

    Ok(())
}
