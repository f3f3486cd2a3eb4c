use std::fs::File;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::tempdir;

use tapebook::{run, PipelineConfig, SideFilter};

const HOUR_NS: u64 = 3_600_000_000_000;

fn push_be(out: &mut Vec<u8>, value: u64, width: usize) {
    for i in (0..width).rev() {
        out.push((value >> (8 * i)) as u8);
    }
}

fn push_header(out: &mut Vec<u8>, locate: u16, ts_ns: u64) {
    push_be(out, locate as u64, 2);
    push_be(out, 0, 2);
    push_be(out, ts_ns, 6);
}

fn push_symbol(out: &mut Vec<u8>, name: &str) {
    let mut bytes = [b' '; 8];
    bytes[..name.len()].copy_from_slice(name.as_bytes());
    out.extend_from_slice(&bytes);
}

fn system_event(ts_ns: u64, code: u8) -> Vec<u8> {
    let mut out = vec![b'S'];
    push_header(&mut out, 0, ts_ns);
    out.push(code);
    out
}

fn directory(locate: u16, ts_ns: u64, name: &str) -> Vec<u8> {
    let mut out = vec![b'R'];
    push_header(&mut out, locate, ts_ns);
    push_symbol(&mut out, name);
    // market category .. inverse indicator: framing-only fields
    out.extend_from_slice(&[b'Q', b'N']);
    push_be(&mut out, 100, 4);
    out.extend_from_slice(&[b'N', b'C', b' ', b' ', b'P', b'N', b'N', b'1', b'N']);
    push_be(&mut out, 0, 4);
    out.push(b'N');
    out
}

fn add_order(locate: u16, ts_ns: u64, order_ref: u64, side: u8, shares: u32, price_raw: u32, name: &str) -> Vec<u8> {
    let mut out = vec![b'A'];
    push_header(&mut out, locate, ts_ns);
    push_be(&mut out, order_ref, 8);
    out.push(side);
    push_be(&mut out, shares as u64, 4);
    push_symbol(&mut out, name);
    push_be(&mut out, price_raw as u64, 4);
    out
}

fn executed(locate: u16, ts_ns: u64, order_ref: u64, shares: u32, match_no: u64) -> Vec<u8> {
    let mut out = vec![b'E'];
    push_header(&mut out, locate, ts_ns);
    push_be(&mut out, order_ref, 8);
    push_be(&mut out, shares as u64, 4);
    push_be(&mut out, match_no, 8);
    out
}

fn cross_trade(locate: u16, ts_ns: u64, shares: u64, price_raw: u32, match_no: u64, name: &str) -> Vec<u8> {
    let mut out = vec![b'Q'];
    push_header(&mut out, locate, ts_ns);
    push_be(&mut out, shares, 8);
    push_symbol(&mut out, name);
    push_be(&mut out, price_raw as u64, 4);
    push_be(&mut out, match_no, 8);
    out.push(b'O');
    out
}

fn broken_trade(locate: u16, ts_ns: u64, match_no: u64) -> Vec<u8> {
    let mut out = vec![b'B'];
    push_header(&mut out, locate, ts_ns);
    push_be(&mut out, match_no, 8);
    out
}

fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("read output csv")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn full_consumption_yields_flat_cumulative_vwap() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("capture.itch");

    let mut capture = Vec::new();
    capture.extend(system_event(0, b'O'));
    capture.extend(directory(1, 0, "ABCD"));
    capture.extend(add_order(1, 0, 100, b'B', 500, 100_000, "ABCD"));
    capture.extend(executed(1, HOUR_NS, 100, 200, 9));
    capture.extend(executed(1, 2 * HOUR_NS, 100, 300, 10));
    std::fs::write(&input, &capture).expect("write capture");

    let mut config = PipelineConfig::new(&input, dir.path().join("out"));
    config.export_raw = true;
    config.summary = Some(dir.path().join("out/summary.json"));
    let summary = run(&config).expect("pipeline run");

    assert_eq!(summary.stats.messages, 5);
    assert_eq!(summary.trades, 2);
    assert_eq!(summary.open_orders, 0);

    let vwap = read_lines(&dir.path().join("out/itch_vwap.csv"));
    assert_eq!(vwap, vec!["name,hour,vwap", "ABCD,1,10", "ABCD,2,10"]);

    let trades = read_lines(&dir.path().join("out/raw_trades.csv"));
    assert_eq!(
        trades,
        vec![
            "name,ts,vol,price",
            format!("ABCD,{HOUR_NS},200,10").as_str(),
            format!("ABCD,{},300,10", 2 * HOUR_NS).as_str(),
        ]
    );

    let orders = read_lines(&dir.path().join("out/open_orders.csv"));
    assert_eq!(orders, vec!["name,ts,vol,price"]);

    let summary_text =
        std::fs::read_to_string(dir.path().join("out/summary.json")).expect("summary json");
    assert!(summary_text.contains("\"messages\": 5"));
}

#[test]
fn duplicate_cross_and_broken_trade_survive_in_the_outputs() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("capture.itch");

    let mut capture = Vec::new();
    capture.extend(directory(1, 0, "ABCD"));
    capture.extend(cross_trade(1, HOUR_NS, 1_000, 100_000, 55, "ABCD"));
    // Same match number: rejected, first print retained.
    capture.extend(cross_trade(1, HOUR_NS, 9_999, 999_000, 55, "ABCD"));
    capture.extend(cross_trade(1, HOUR_NS, 500, 120_000, 56, "ABCD"));
    capture.extend(broken_trade(1, HOUR_NS, 56));
    std::fs::write(&input, &capture).expect("write capture");

    let mut config = PipelineConfig::new(&input, dir.path().join("out"));
    config.export_raw = true;
    let summary = run(&config).expect("pipeline run");

    assert_eq!(summary.stats.duplicate_matches, 1);
    assert_eq!(summary.trades, 1);

    let trades = read_lines(&dir.path().join("out/raw_trades.csv"));
    assert_eq!(
        trades,
        vec![
            "name,ts,vol,price",
            format!("ABCD,{HOUR_NS},1000,10").as_str()
        ]
    );
}

#[test]
fn untracked_sell_reference_skips_without_aborting() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("capture.itch");

    let mut capture = Vec::new();
    capture.extend(directory(1, 0, "ABCD"));
    capture.extend(add_order(1, 0, 7, b'S', 100, 100_000, "ABCD"));
    capture.extend(executed(1, 10, 7, 100, 1));
    capture.extend(add_order(1, 20, 8, b'B', 50, 110_000, "ABCD"));
    std::fs::write(&input, &capture).expect("write capture");

    let mut config = PipelineConfig::new(&input, dir.path().join("out"));
    config.export_raw = true;
    let summary = run(&config).expect("pipeline run");

    assert_eq!(summary.stats.filtered, 1);
    assert_eq!(summary.stats.unknown_orders, 1);
    assert_eq!(summary.trades, 0);
    assert_eq!(summary.open_orders, 1);

    // Same capture with both sides tracked prints the trade.
    let mut config = PipelineConfig::new(&input, dir.path().join("out_both"));
    config.side_filter = SideFilter::Both;
    let summary = run(&config).expect("pipeline run");
    assert_eq!(summary.trades, 1);
}

#[test]
fn gz_capture_decodes_identically() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("capture.itch.gz");

    let mut capture = Vec::new();
    capture.extend(directory(1, 0, "ABCD"));
    capture.extend(add_order(1, 0, 100, b'B', 500, 100_000, "ABCD"));
    capture.extend(executed(1, HOUR_NS, 100, 500, 9));

    let file = File::create(&input).expect("create gz");
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(&capture).expect("write gz");
    encoder.finish().expect("finish gz");

    let config = PipelineConfig::new(&input, dir.path().join("out"));
    let summary = run(&config).expect("pipeline run");
    assert_eq!(summary.trades, 1);

    let vwap = read_lines(&dir.path().join("out/itch_vwap.csv"));
    assert_eq!(vwap, vec!["name,hour,vwap", "ABCD,1,10"]);
}

#[test]
fn truncated_capture_aborts_the_run() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("capture.itch");

    let mut capture = directory(1, 0, "ABCD");
    let add = add_order(1, 0, 100, b'B', 500, 100_000, "ABCD");
    capture.extend(&add[..add.len() - 5]);
    std::fs::write(&input, &capture).expect("write capture");

    let config = PipelineConfig::new(&input, dir.path().join("out"));
    assert!(run(&config).is_err());
}

#[test]
fn limit_stops_the_pass_early() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("capture.itch");

    let mut capture = Vec::new();
    capture.extend(directory(1, 0, "ABCD"));
    capture.extend(add_order(1, 0, 100, b'B', 500, 100_000, "ABCD"));
    capture.extend(executed(1, HOUR_NS, 100, 500, 9));
    std::fs::write(&input, &capture).expect("write capture");

    let mut config = PipelineConfig::new(&input, dir.path().join("out"));
    config.limit = Some(2);
    let summary = run(&config).expect("pipeline run");
    assert_eq!(summary.stats.messages, 2);
    assert_eq!(summary.trades, 0);
    assert_eq!(summary.open_orders, 1);
}
