use super::*;

fn descriptor(x: f64, w: f64) -> NormalizedCropDescriptor {
    NormalizedCropDescriptor {
        normalized_x: x,
        normalized_y: 0.0,
        normalized_width: w,
        normalized_height: 1.0,
        rotation: 0.0,
        original_width: 800,
        original_height: 600,
        scale: 1.0,
        timestamp: 1,
    }
}

#[test]
fn json_round_trip() {
    let mut state = PersistedCropState {
        main_crop_aspect_ratio: Some(4.0 / 3.0),
        ..Default::default()
    };
    state.roles.insert(
        ImageRole::Primary,
        PersistedRoleState {
            descriptor: Some(descriptor(0.25, 0.5)),
            settings: Some(CropSettings {
                x: 1.0,
                y: 2.0,
                width: 3.0,
                height: 4.0,
                rotation: 5.0,
                scale: 1.0,
            }),
        },
    );

    let json = state.to_json_string().unwrap();
    assert!(json.contains("\"primary\""));
    assert!(json.contains("mainCropAspectRatio"));
    assert_eq!(PersistedCropState::from_json_str(&json).unwrap(), state);
}

#[test]
fn descriptors_are_clamped_on_load() {
    let json = r#"{
        "roles": {
            "dependent": {
                "descriptor": {
                    "normalizedX": 0.8, "normalizedY": 0.0,
                    "normalizedWidth": 0.5, "normalizedHeight": 1.0,
                    "rotation": 0.0, "originalWidth": 10, "originalHeight": 10,
                    "scale": 1.0, "timestamp": 0
                }
            }
        },
        "mainCropAspectRatio": -2.0
    }"#;
    let state = PersistedCropState::from_json_str(json).unwrap();
    let d = state.roles[&ImageRole::Dependent].descriptor.unwrap();
    assert!((d.normalized_x + d.normalized_width - 1.0).abs() < 1e-12);
    assert_eq!(state.main_crop_aspect_ratio, None);
}

#[test]
fn descriptors_are_clamped_on_save() {
    let mut state = PersistedCropState::default();
    state.roles.insert(
        ImageRole::Primary,
        PersistedRoleState {
            descriptor: Some(descriptor(0.9, 0.9)),
            settings: None,
        },
    );
    let json = state.to_json_string().unwrap();
    let back = PersistedCropState::from_json_str(&json).unwrap();
    let d = back.roles[&ImageRole::Primary].descriptor.unwrap();
    assert!(d.normalized_width <= 0.1 + 1e-12);
    assert!(!json.contains("settings"));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = PersistedCropState::from_json_str("{ nope").unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
}

#[test]
fn file_round_trip() {
    let dir = std::env::temp_dir().join(format!("cropframe-persist-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("state.json");
    let state = PersistedCropState {
        main_crop_aspect_ratio: Some(1.5),
        ..Default::default()
    };
    state.save(&path).unwrap();
    assert_eq!(PersistedCropState::load(&path).unwrap(), state);
    let _ = std::fs::remove_dir_all(&dir);
}
