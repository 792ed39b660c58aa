use super::*;

#[test]
fn defaults_match_stock_tool() {
    let cfg = CropConfig::default();
    assert_eq!(cfg.min_crop_size, 10.0);
    assert_eq!(cfg.hit_margin, 20.0);
    assert_eq!(cfg.max_canvas_side, None);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = CropConfig::from_json_str(r#"{ "hit_margin": 12.0, "max_canvas_side": 900 }"#)
        .unwrap();
    assert_eq!(cfg.hit_margin, 12.0);
    assert_eq!(cfg.max_canvas_side, Some(900));
    assert_eq!(cfg.min_crop_size, 10.0);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(CropConfig::from_json_str(r#"{ "min_crop_size": 0 }"#).is_err());
    assert!(CropConfig::from_json_str(r#"{ "dash": [6.0, -1.0] }"#).is_err());
    assert!(CropConfig::from_json_str(r#"{ "max_canvas_side": 0 }"#).is_err());
    assert!(matches!(
        CropConfig::from_json_str("{"),
        Err(CropError::Serde(_))
    ));
}

#[test]
fn load_reports_missing_file() {
    let err = CropConfig::load(Path::new("target/does/not/exist.json")).unwrap_err();
    assert!(err.to_string().contains("read crop config"));
}
