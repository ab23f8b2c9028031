//! Criterion benchmarks for model construction and a synthetic analysis run.
//!
//! The network is a square grid of junctions with roads running east and
//! south, so the north-west corner is the only entrance and the south-east
//! corner the only exit.
//!
//! Run with: cargo bench -p roadmoe_core --bench bench_main

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use roadmoe_core::loading::{EdgeRecord, JunctionRecord, LaneRecord, NetworkRecords, VehicleRecord};
use roadmoe_core::prelude::*;

const EDGE_LENGTH: f64 = 100.0;

fn junction_id(row: usize, col: usize) -> String {
    format!("J{row}_{col}")
}

fn road(id: String, from: String, to: String) -> EdgeRecord {
    EdgeRecord {
        lanes: vec![LaneRecord {
            id: format!("{id}_0"),
            index: 0,
            speed: 13.9,
            length: EDGE_LENGTH,
            shape: format!("0,0 {EDGE_LENGTH},0"),
        }],
        id,
        function: None,
        edge_type: Some("highway.primary".to_string()),
        from: Some(from),
        to: Some(to),
    }
}

fn grid_records(size: usize) -> NetworkRecords {
    let mut records = NetworkRecords::default();
    for row in 0..size {
        for col in 0..size {
            records.junctions.push(JunctionRecord {
                id: junction_id(row, col),
                junction_type: "priority".to_string(),
                int_lanes: String::new(),
            });
            if col + 1 < size {
                records.edges.push(road(
                    format!("e{row}_{col}"),
                    junction_id(row, col),
                    junction_id(row, col + 1),
                ));
            }
            if row + 1 < size {
                records.edges.push(road(
                    format!("s{row}_{col}"),
                    junction_id(row, col),
                    junction_id(row + 1, col),
                ));
            }
        }
    }
    records
}

/// Vehicles driving east along every row at 10 m/s, one sample per second
fn row_traffic(size: usize, seconds: usize) -> Vec<TimestepBatch> {
    (0..seconds)
        .map(|second| {
            let time = second as f64;
            let travelled = time * 10.0;
            let col = ((travelled / EDGE_LENGTH) as usize).min(size - 2);
            let entries = (0..size)
                .map(|row| {
                    let record = VehicleRecord {
                        id: format!("v{row}"),
                        vehicle_type: "car".to_string(),
                        lane: format!("e{row}_{col}_0"),
                        pos: travelled % EDGE_LENGTH,
                        speed: 10.0,
                    };
                    Entry::from_record(&record, time).unwrap()
                })
                .collect();
            TimestepBatch::new(time, entries)
        })
        .collect()
}

fn bench_model_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_build");
    for size in [4, 6, 8] {
        let records = grid_records(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                NetworkModel::from_records(black_box(records), &ModelConfig::default()).unwrap()
            });
        });
    }
    group.finish();
}

fn bench_shortest_paths(c: &mut Criterion) {
    let records = grid_records(12);
    let config = ModelConfig {
        shortest_paths: true,
        ..ModelConfig::default()
    };
    c.bench_function("model_build_shortest_12", |b| {
        b.iter(|| NetworkModel::from_records(black_box(&records), &config).unwrap());
    });
}

fn bench_analysis(c: &mut Criterion) {
    let size = 8;
    let batches = row_traffic(size, 60);
    let template = NetworkModel::from_records(&grid_records(size), &ModelConfig::default()).unwrap();

    c.bench_function("analysis_8x8_60s", |b| {
        b.iter(|| {
            let mut model = template.clone();
            let mut analyzer = MoeAnalyzer::new(&mut model, AnalyzerConfig::default()).unwrap();
            let mut sink = MemorySink::new();
            let source = batches.iter().cloned().map(Ok);
            black_box(analyzer.run(source, &mut sink).unwrap())
        });
    });
}

criterion_group!(
    benches,
    bench_model_build,
    bench_shortest_paths,
    bench_analysis,
);
criterion_main!(benches);
