//! Write resolved station information into a configuration structure.
use super::{StationInfo, UNIT_SYSTEMS};
use crate::config::{ConfigObj, Section, Value};
use crate::drivers::DriverCatalog;
use crate::logging::Log;

/// Apply `info` to `config`.
///
/// * `location`, `latitude`, `longitude` and `altitude` go to `[Station]`.
/// * The driver decides `station_type`: a catalogued driver uses its own
///   section name, an unknown one keeps the station type already in `info`.
///   That section gets `driver`, the catalog defaults for any setting it
///   lacks, and every driver-specific value in `info`.
/// * `register_this_station` goes to `[StdRESTful] [[StationRegistry]]`.
/// * `units` becomes `unit_system` in `[StdReport] [[Defaults]]`.
///
/// With `debug`, every value written is logged.
pub fn modify_config(
    config: &mut ConfigObj,
    info: &StationInfo,
    catalog: &DriverCatalog,
    log: &dyn Log,
    debug: bool,
) {
    let driver = info.text("driver");
    let entry = driver.as_deref().and_then(|module| catalog.find(module));
    if let (Some(module), None) = (driver.as_deref(), entry) {
        log.warn(&format!(
            "driver '{module}' is not in the driver catalog; keeping station type as given"
        ));
    }
    let station_type = entry
        .map(|d| d.station_type.clone())
        .or_else(|| info.text("station_type"));

    let mut trace = |path: &str, value: &Value| {
        if debug {
            log.debug(&format!("{path} = {}", value.to_joined()));
        }
    };

    let station = config.root.ensure_section("Station");
    for key in ["location", "latitude", "longitude", "altitude"] {
        if let Some(value) = info.get(key) {
            set_traced(station, "Station", key, value, &mut trace);
        }
    }

    if let Some(station_type) = station_type {
        set_traced(
            station,
            "Station",
            "station_type",
            &Value::from(station_type.as_str()),
            &mut trace,
        );

        let section = config.root.ensure_section(&station_type);
        if let Some(entry) = entry {
            for setting in &entry.settings {
                if !section.contains_key(&setting.name) {
                    set_traced(
                        section,
                        &station_type,
                        &setting.name,
                        &Value::from(setting.default.as_str()),
                        &mut trace,
                    );
                }
            }
        }
        if let Some(module) = &driver {
            set_traced(
                section,
                &station_type,
                "driver",
                &Value::from(module.as_str()),
                &mut trace,
            );
        }
        for (key, value) in info.driver_settings() {
            set_traced(section, &station_type, key, value, &mut trace);
        }
    }

    if let Some(register) = info.get("register_this_station") {
        let registry = config
            .root
            .ensure_section("StdRESTful")
            .ensure_section("StationRegistry");
        set_traced(
            registry,
            "StdRESTful.StationRegistry",
            "register_this_station",
            register,
            &mut trace,
        );
    }

    if let Some(units) = info.text("units") {
        if !UNIT_SYSTEMS.contains(&units.as_str()) {
            log.warn(&format!("unknown unit system '{units}'"));
        }
        let defaults = config
            .root
            .ensure_section("StdReport")
            .ensure_section("Defaults");
        set_traced(
            defaults,
            "StdReport.Defaults",
            "unit_system",
            &Value::from(units.as_str()),
            &mut trace,
        );
    }
}

fn set_traced(
    section: &mut Section,
    path: &str,
    key: &str,
    value: &Value,
    trace: &mut impl FnMut(&str, &Value),
) {
    section.set(key, value.clone());
    trace(&format!("{path}.{key}"), value);
}
