#![cfg(feature = "serde")]

use softmesh::{Bounds, SolverConfig, SpringToggles, Vec2};

#[test]
fn partial_config_fills_defaults() {
    let config: SolverConfig<f32> =
        serde_json::from_str(r#"{ "iterations": 4, "gravity": { "x": 0.0, "y": -9.81 } }"#).unwrap();
    assert_eq!(config.iterations, 4);
    assert_eq!(config.gravity, Vec2::new(0.0, -9.81));
    assert_eq!(config.collision_iterations, SolverConfig::<f32>::new().collision_iterations);
    assert_eq!(config.damping, 0.99);
    assert!(config.bounds.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn config_survives_json() {
    let config = SolverConfig::new()
        .with_sub_steps(3)
        .with_bounds(Bounds::new(Vec2::new(-1.0f64, -1.0), Vec2::new(1.0, 1.0), 0.5));
    let json = serde_json::to_string(&config).unwrap();
    let back: SolverConfig<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn toggles_deserialize() {
    let t: SpringToggles = serde_json::from_str(r#"{ "structural": true, "shear": false, "bend": true }"#).unwrap();
    assert!(t.allows(softmesh::SpringType::Bend));
    assert!(!t.allows(softmesh::SpringType::Shear));
}
