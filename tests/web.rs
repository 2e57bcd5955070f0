//! Browser tests for the JS bindings. Run with `wasm-pack test --headless
//! --chrome -- --no-default-features`.

#![cfg(target_arch = "wasm32")]

use lidar_graph::{LidarGraphWasm, ScanConfig};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn build_graph_half_circle() {
    let mut converter = LidarGraphWasm::new(-90.0, 90.0, 2.0).unwrap();
    let graph = converter.build_graph(&[1.0, 1.0, 1.0]).unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.edge_pairs(), vec![0, 1, 1, 2]);
    assert_eq!(graph.neighbors(1), vec![0, 2]);
    assert_eq!(graph.positions_x().length(), 3);
    assert_eq!(graph.ranges().to_vec(), vec![1.0, 1.0, 1.0]);
    assert_eq!(graph.get_node_distance(2), Some(1.0));
    assert_eq!(graph.get_node_x(3), None);
}

#[wasm_bindgen_test]
fn empty_scan_throws() {
    let mut converter = LidarGraphWasm::new(-135.0, 135.0, 1.0).unwrap();
    assert!(converter.build_graph(&[]).is_err());
}

#[wasm_bindgen_test]
fn invalid_threshold_throws() {
    assert!(LidarGraphWasm::new(-135.0, 135.0, -1.0).is_err());
    assert!(LidarGraphWasm::new(10.0, -10.0, 1.0).is_err());
}

#[wasm_bindgen_test]
fn from_partial_config() {
    let config = ScanConfig::default().with_max_distance(0.5);
    let value = serde_wasm_bindgen::to_value(&config).unwrap();
    let mut converter = LidarGraphWasm::from_config(value).unwrap();

    let graph = converter.build_graph(&[1.0, 1.0, 1.0, 1.0]).unwrap();
    assert_eq!(graph.node_count(), 4);

    assert!(LidarGraphWasm::from_config(JsValue::UNDEFINED).is_ok());
}
