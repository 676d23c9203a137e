use super::*;

#[test]
fn can_read_config_with_defaults() {
    let config = read_engine_config(r#"{ "seed": 5 }"#.as_bytes()).expect("cannot read config");

    assert_eq!(config, EngineConfig { sequence_sample_size: 24, closest_stops: 20, seed: Some(5) });
}

#[test]
fn can_read_camel_case_fields() {
    let config =
        read_engine_config(r#"{ "sequenceSampleSize": 3, "closestStops": 7 }"#.as_bytes()).expect("cannot read config");

    assert_eq!(config.sequence_sample_size, 3);
    assert_eq!(config.closest_stops, 7);
    assert_eq!(config.seed, None);
}

parameterized_test! {can_reject_invalid_config, json, {
    assert!(read_engine_config(json.as_bytes()).is_err());
}}

can_reject_invalid_config! {
    case01_zero_sample_size: r#"{ "sequenceSampleSize": 0 }"#,
    case02_malformed_json: r#"{ "seed": "#,
    case03_wrong_type: r#"{ "closestStops": "many" }"#,
}
