mod common;

use roadmoe_core::prelude::*;

use common::{NORTH_EAST_FCD, assert_close, crossing};

fn per_second() -> AnalyzerConfig {
    AnalyzerConfig {
        calculation_rate: 1.0,
        min_speed: 1.0,
        start_time: 0.0,
    }
}

#[test]
fn fcd_stream_to_csv_rows() {
    let mut model = NetworkModel::from_records(&crossing(), &ModelConfig::default()).unwrap();
    let system_count = model.system_count();
    let mut sink = CsvSink::from_writer(Vec::new());

    let summary = {
        let mut analyzer = MoeAnalyzer::new(&mut model, per_second()).unwrap();
        let source = FcdReader::from_reader(NORTH_EAST_FCD.as_bytes());
        analyzer.run(source, &mut sink).unwrap()
    };
    assert_eq!(summary.batches, 5);
    assert_eq!(summary.cycles, 4);
    assert_eq!(summary.records, 4 * system_count);

    let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 1 + 4 * system_count);
    assert!(lines.contains(&"0.0,edge,n_in,0.0,0.0,0.0,0.0,1.0"));
    assert!(lines.contains(&"3.0,edge,c_e,1.0,1.0,0.0,0.0,1.0"));
}

#[test]
fn vehicle_is_followed_through_the_intersection() {
    let mut model = NetworkModel::from_records(&crossing(), &ModelConfig::default()).unwrap();
    model.add_group("north-east", &["n_in", ":C_0", "c_e"]).unwrap();
    let mut sink = MemorySink::new();

    let mut analyzer = MoeAnalyzer::new(&mut model, per_second()).unwrap();
    analyzer
        .run(FcdReader::from_reader(NORTH_EAST_FCD.as_bytes()), &mut sink)
        .unwrap();
    assert_eq!(analyzer.state(), AnalyzerState::Drained);

    // Cycle 1: the vehicle entered the connector at its free-flow speed
    let connector = sink.cycles[1].get(SystemKind::Edge, ":C_0").unwrap();
    assert_close(connector.moe.throughput, 1.0);
    assert_close(connector.moe.total_delay, 0.0);

    // Cycle 3: it drove 10 m on c_e at the free-flow speed
    let last = &sink.cycles[3];
    assert_close(last.timestamp, 3.0);
    for (kind, id) in [
        (SystemKind::Edge, "c_e"),
        (SystemKind::Section, "C"),
        (SystemKind::Path, "n_in->c_e|0"),
        (SystemKind::Group, "0"),
    ] {
        let record = last.get(kind, id).unwrap();
        assert_close(record.moe.throughput, 1.0);
        assert_close(record.moe.tti, 1.0);
        assert_close(record.moe.total_delay, 0.0);
    }
    let other_path = last.get(SystemKind::Path, "s_in->c_w|0").unwrap();
    assert_eq!(other_path.moe, Moe::default());

    let visited: Vec<_> = analyzer
        .model()
        .edges()
        .iter()
        .map(|edge| (edge.id.as_str(), edge.counters().v_visited))
        .collect();
    assert!(visited.contains(&("n_in", 1)));
    assert!(visited.contains(&(":C_0", 1)));
    assert!(visited.contains(&("c_e", 1)));
    assert!(visited.contains(&("c_w", 0)));
}

#[test]
fn off_network_samples_are_ignored() {
    let mut model = NetworkModel::from_records(&crossing(), &ModelConfig::default()).unwrap();
    let data = "time,id,type,lane,pos,speed
0.0,ghost,car,elsewhere_0,0.0,10.0
1.0,ghost,car,elsewhere_0,10.0,10.0
2.0,ghost,car,elsewhere_0,20.0,10.0
";
    let mut sink = MemorySink::new();
    let mut analyzer = MoeAnalyzer::new(&mut model, per_second()).unwrap();
    analyzer
        .run(FcdReader::from_reader(data.as_bytes()), &mut sink)
        .unwrap();

    assert_eq!(sink.cycles.len(), 2);
    assert!(
        sink.cycles
            .iter()
            .flat_map(|cycle| cycle.records.iter())
            .all(|record| record.moe == Moe::default())
    );
}

#[test]
fn decreasing_fcd_time_aborts_the_run() {
    let mut model = NetworkModel::from_records(&crossing(), &ModelConfig::default()).unwrap();
    let data = "time,id,type,lane,pos,speed
2.0,v1,car,n_in_0,0.0,10.0
1.0,v1,car,n_in_0,10.0,10.0
";
    let mut analyzer = MoeAnalyzer::new(&mut model, per_second()).unwrap();
    let err = analyzer
        .run(FcdReader::from_reader(data.as_bytes()), &mut MemorySink::new())
        .unwrap_err();
    assert!(matches!(err, Error::OutOfOrder { .. }));
}
