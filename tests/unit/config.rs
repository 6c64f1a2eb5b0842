use super::*;
use crate::dispatch::global::THREAD_COUNT_TEST_LOCK;
use crate::dispatch::num_dispatch_threads;
use crate::filters::FilterPrimitive;
use crate::foundation::core::Affine;

#[test]
fn engine_defaults_to_four_threads() {
    assert_eq!(EngineConfig::default().dispatch_threads, 4);
    assert_eq!(EngineConfig::from_json_str("{}").unwrap(), EngineConfig::default());
}

#[test]
fn engine_json_is_strict() {
    let cfg = EngineConfig::from_json_str(r#"{"dispatch_threads": 6}"#).unwrap();
    assert_eq!(cfg.dispatch_threads, 6);

    let err = EngineConfig::from_json_str(r#"{"threads": 6}"#).unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
    let err = EngineConfig::from_json_str(r#"{"dispatch_threads": 0}"#).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
}

#[test]
fn env_values() {
    assert_eq!(EngineConfig::from_env_value(None).unwrap(), EngineConfig::default());
    assert_eq!(EngineConfig::from_env_value(Some(" 3 ")).unwrap().dispatch_threads, 3);
    for bad in ["", "0", "-2", "four"] {
        assert!(EngineConfig::from_env_value(Some(bad)).is_err(), "{bad:?}");
    }
}

#[test]
fn apply_sets_thread_count() {
    let _guard = THREAD_COUNT_TEST_LOCK
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    EngineConfig { dispatch_threads: 2 }.apply().unwrap();
    assert_eq!(num_dispatch_threads(), 2);
    assert!(EngineConfig { dispatch_threads: 0 }.apply().is_err());
    assert_eq!(num_dispatch_threads(), 2);
    EngineConfig::default().apply().unwrap();
    assert_eq!(num_dispatch_threads(), DEFAULT_DISPATCH_THREADS);
}

#[test]
fn drop_shadow_params_accept_svg_names() {
    let p = DropShadowParams::from_json_str(
        r##"{"dx": 3, "stdDeviation": 1.5, "flood-color": "#ff000080", "flood-opacity": 0.25}"##,
    )
    .unwrap();
    assert_eq!(p.dx, 3.0);
    assert_eq!(p.dy, 2.0);
    assert_eq!(p.std_deviation, 1.5);
    assert_eq!(p.flood_color, Rgba32::from_rgba(255, 0, 0, 128));
    assert_eq!(p.flood_opacity, 0.25);

    let json = serde_json::to_string(&DropShadowParams::default()).unwrap();
    assert!(json.contains(r##""flood_color":"#000000ff""##), "{json}");
}

#[test]
fn drop_shadow_params_reject_bad_colors() {
    assert!(DropShadowParams::from_json_str(r#"{"flood_color": "red"}"#).is_err());
    assert!(DropShadowParams::from_json_str(r#"{"blur": 1}"#).is_err());
}

#[test]
fn build_goes_through_clamping_setters() {
    let params = DropShadowParams {
        std_deviation: -1.0,
        flood_opacity: 3.0,
        ..DropShadowParams::default()
    };
    let p = params.build();
    assert_eq!(p.std_deviation(), 0.0);
    assert_eq!(p.flood_opacity(), 1.0);
    assert_eq!(p.complexity(Affine::IDENTITY), 1.0);
}

#[test]
fn region_grows_symmetrically() {
    let params = DropShadowParams {
        dx: -1.0,
        dy: 4.0,
        std_deviation: 1.0,
        ..DropShadowParams::default()
    };
    let region = params.calculate_region(Rect::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(region, Rect::new(-4.0, -7.0, 14.0, 17.0));
}

#[test]
fn non_finite_params_are_rejected() {
    let params = DropShadowParams {
        dx: f64::INFINITY,
        ..DropShadowParams::default()
    };
    assert!(params.validate().is_err());
}
