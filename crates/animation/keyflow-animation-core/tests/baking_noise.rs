use approx::assert_abs_diff_eq;
use keyflow_animation_core::baking::MAX_BAKED_FRAMES;
use keyflow_animation_core::{
    bake_animated_path, bake_track, export_baked_json, parse_animation_json, AnimError,
    BakingConfig, Keyframe, Noise, NoiseFunction, Track, Value,
};

fn title_card() -> keyflow_animation_core::AnimationSet {
    let json = keyflow_test_fixtures::documents::json("title_card").unwrap();
    parse_animation_json(&json).unwrap()
}

#[test]
fn baked_frames_match_direct_evaluation() {
    let set = title_card();
    let tint = set.track("tint").unwrap();
    let cfg = BakingConfig {
        frame_rate: 30.0,
        ..BakingConfig::default()
    };
    let baked = bake_track(tint, &cfg).unwrap();
    assert_eq!(baked.end_time, 4.0);
    assert_eq!(baked.values.len(), 121);
    for (i, value) in baked.values.iter().enumerate() {
        let t = (i as f32 / 30.0).min(4.0);
        assert_eq!(*value, tint.evaluate(t).unwrap());
    }
    assert_eq!(baked.values.last(), Some(&Value::Vec4([0.0, 0.0, 1.0, 1.0])));
}

#[test]
fn baked_velocities_for_vector_track() {
    let set = title_card();
    let tint = set.track("tint").unwrap();
    let cfg = BakingConfig {
        frame_rate: 2.0,
        include_velocities: true,
        ..BakingConfig::default()
    };
    let baked = bake_track(tint, &cfg).unwrap();
    let velocities = baked.velocities.unwrap();
    assert_eq!(velocities.len(), baked.values.len());
    // Red fades out while blue fades in, at the same rate.
    let Some(Value::Vec4(mid)) = velocities[4] else {
        panic!("expected a Vec4 velocity");
    };
    assert!(mid[0] < 0.0);
    assert_abs_diff_eq!(mid[0], -mid[2], epsilon = 1e-5);
    assert_eq!(mid[3], 0.0);
}

#[test]
fn rotation_velocities_are_absent() {
    let set = title_card();
    let cfg = BakingConfig {
        frame_rate: 4.0,
        include_velocities: true,
        ..BakingConfig::default()
    };
    let baked = bake_track(set.track("spin").unwrap(), &cfg).unwrap();
    assert!(baked.velocities.unwrap().iter().all(Option::is_none));
}

#[test]
fn baked_animated_path() {
    let json = keyflow_test_fixtures::documents::json("path_simple_bezier").unwrap();
    let set = parse_animation_json(&json).unwrap();
    let dot = set.animated_path("dot").unwrap();
    let cfg = BakingConfig {
        frame_rate: 10.0,
        start_time: 0.5,
        end_time: Some(1.5),
        include_velocities: false,
    };
    let baked = bake_animated_path(dot, &cfg).unwrap();
    assert_eq!(baked.positions.len(), 11);
    assert_eq!(baked.positions[0], dot.evaluate(0.5).unwrap());
    assert_eq!(baked.positions[10], dot.evaluate(1.5).unwrap());

    let json = export_baked_json(&baked).unwrap();
    assert_eq!(json["positions"].as_array().map(Vec::len), Some(11));
}

#[test]
fn huge_frame_rates_are_rejected() {
    let ramp = Track::new(vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)]).unwrap();
    for frame_rate in [1e30, f32::MAX, MAX_BAKED_FRAMES as f32] {
        let cfg = BakingConfig {
            frame_rate,
            ..BakingConfig::default()
        };
        let err = bake_track(&ramp, &cfg).unwrap_err();
        assert!(matches!(err, AnimError::InvalidBaking { .. }), "{frame_rate}");
        assert_eq!(err.category(), "baking");
    }

    let long_window = BakingConfig {
        frame_rate: 60.0,
        end_time: Some(1e9),
        ..BakingConfig::default()
    };
    assert!(matches!(
        bake_track(&ramp, &long_window),
        Err(AnimError::InvalidBaking { .. })
    ));

    // Ordinary high rates still bake.
    let cfg = BakingConfig {
        frame_rate: 1000.0,
        ..BakingConfig::default()
    };
    assert_eq!(bake_track(&ramp, &cfg).unwrap().values.len(), 1001);
}

#[test]
fn noise_is_reproducible_and_seeded() {
    let a = Noise {
        seed: 42,
        function: NoiseFunction::Cubic,
        ..Noise::default()
    };
    let b = a.clone();
    let samples: Vec<f32> = (0..200).map(|i| a.evaluate(i as f32 * 0.013).unwrap()).collect();
    let again: Vec<f32> = (0..200).map(|i| b.evaluate(i as f32 * 0.013).unwrap()).collect();
    assert_eq!(samples, again);
    assert!(samples.iter().all(|n| (-1.0..=1.0).contains(n)));
    assert!(samples.iter().any(|n| *n != 0.0));
}

#[test]
fn noise_round_trips_through_json() {
    let noise = Noise {
        octaves: 5,
        lacunarity: 1.8,
        gain: 0.4,
        seed: 99,
        function: NoiseFunction::Quintic,
    };
    let json = serde_json::to_string(&noise).unwrap();
    let back: Noise = serde_json::from_str(&json).unwrap();
    assert_eq!(back, noise);
    assert_eq!(back.evaluate(3.3).unwrap(), noise.evaluate(3.3).unwrap());
}
