//! Integration test: loading the simulator configuration from disk.

use std::io::Write;

use servo_common::bus::Encoding;
use servo_common::config::{ConfigError, ConfigLoader, Delivery};
use servo_link::sim::{LinkConfig, Simulation};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn shipped_config_loads_and_validates() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/servo_link.toml");
    let config = LinkConfig::load(std::path::Path::new(path)).unwrap();
    config.validate().unwrap();
    assert_eq!(config.shared.service_name, "servo-link-sim");
    assert_eq!(config.simulation.periods, 500);
}

#[test]
fn written_config_round_trips_through_disk() {
    let mut config = LinkConfig::from_toml("[shared]\nservice_name = \"t\"\n").unwrap();
    config.bus.encoding = Encoding::ThreeByte;
    config.bus.delivery = Delivery::Queued;
    config.simulation.periods = 60;

    let file = write_config(&toml::to_string(&config).unwrap());
    let loaded = LinkConfig::load(file.path()).unwrap();
    assert_eq!(loaded.bus, config.bus);
    assert_eq!(loaded.simulation, config.simulation);

    let report = Simulation::new(loaded.bus, loaded.simulation).run().unwrap();
    assert_eq!(report.periods, 60);
    assert_eq!(report.slave_commands, 6);
}

#[test]
fn unknown_bus_key_is_a_parse_error() {
    let file = write_config(
        r#"
[shared]
service_name = "t"

[bus]
baud_rate = 100000
"#,
    );
    assert!(matches!(
        LinkConfig::load(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn invalid_local_bits_fail_validation() {
    let file = write_config(
        r#"
[shared]
service_name = "t"

[bus]
local_address_bits = 3
"#,
    );
    let config = LinkConfig::load(file.path()).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError(_))
    ));
}
