//! Loading configuration from the environment and from YAML files.
//!
//! Environment variables are process-wide, so every env case runs inside a
//! single test.

use restart_codec::{
    decode_configured, ByteOrder, FieldLayout, RestartConfig, RestartError,
};
use test_utils::{create_test_restart, write_restart_file, ScratchDir};

const VARS: [&str; 4] = [
    "RESTART_PATH",
    "RESTART_GRID_SHAPE",
    "RESTART_FIELDS",
    "RESTART_BYTE_ORDER",
];

fn clear_vars() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
fn test_from_env() {
    clear_vars();
    assert!(matches!(RestartConfig::from_env(), Err(RestartError::Config(_))));

    std::env::set_var("RESTART_PATH", "/data/cm1out_rst_000013_s.dat");
    std::env::set_var("RESTART_GRID_SHAPE", "1700,1700,121");
    std::env::set_var("RESTART_FIELDS", "u,v,w,th");

    let config = RestartConfig::from_env().unwrap();
    assert_eq!(config.grid_shape.dims(), (1700, 1700, 121));
    assert_eq!(config.field_layout, FieldLayout::cm1_uvwth());
    assert_eq!(config.byte_order, ByteOrder::Little);

    std::env::set_var("RESTART_BYTE_ORDER", "big");
    assert_eq!(RestartConfig::from_env().unwrap().byte_order, ByteOrder::Big);

    std::env::set_var("RESTART_BYTE_ORDER", "sideways");
    assert!(RestartConfig::from_env().is_err());

    std::env::set_var("RESTART_BYTE_ORDER", "little");
    std::env::set_var("RESTART_FIELDS", "u,v,u");
    assert!(matches!(
        RestartConfig::from_env(),
        Err(RestartError::DuplicateField(_))
    ));

    std::env::set_var("RESTART_FIELDS", "u,v");
    std::env::set_var("RESTART_GRID_SHAPE", "1700,1700");
    assert!(RestartConfig::from_env().is_err());

    clear_vars();
}

#[test]
fn test_yaml_file_drives_decode() {
    let scratch = ScratchDir::new();
    let data = scratch.file("rst.dat");
    write_restart_file(&data, &create_test_restart(2, 1, 2, 3)).unwrap();

    let config_path = scratch.file("restart.yaml");
    std::fs::write(
        &config_path,
        format!(
            "path: {}\ngrid_shape: {{ nx: 1, ny: 2, nz: 3 }}\nfield_layout: [u, th]\n",
            data.display()
        ),
    )
    .unwrap();

    let config = RestartConfig::from_yaml(&config_path).unwrap();
    let fields = decode_configured(&config).unwrap();
    assert_eq!(fields.get("th").unwrap()[[0, 1, 2]], 1_000_102.0);
}

#[test]
fn test_missing_yaml_file() {
    let scratch = ScratchDir::new();
    assert!(matches!(
        RestartConfig::from_yaml(scratch.file("none.yaml")),
        Err(RestartError::FileAccess { .. })
    ));
}
