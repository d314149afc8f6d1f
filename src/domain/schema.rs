// Telemetry schema - declarative field mapping for AxeOS system info

/// How a resolved value is typed in the canonical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Boolean,
    Numeric,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Measurement,
    Diagnostic,
    Config,
}

/// One tracked metric: where to find it across firmware variants and how to
/// type it. Candidate paths are tried in declaration order; the first one
/// that resolves wins.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub paths: &'static [&'static [&'static str]],
    pub kind: ValueKind,
    pub category: Category,
}

macro_rules! field {
    ($key:literal, $label:literal, $unit:expr, $paths:expr, $kind:ident, $cat:ident) => {
        FieldSpec {
            key: $key,
            label: $label,
            unit: $unit,
            paths: $paths,
            kind: ValueKind::$kind,
            category: Category::$cat,
        }
    };
}

/// The full field table for `/api/system/info`. Several keys carry more than
/// one candidate path because firmware variants renamed or nested them
/// (e.g. NerdAxe uses `deviceModel` where AxeOS uses `boardVersion`).
pub const TELEMETRY_SCHEMA: &[FieldSpec] = &[
    field!("power", "Power Consumption", Some("W"), &[&["power"]], Numeric, Measurement),
    field!("voltage", "Voltage", Some("mV"), &[&["voltage"]], Numeric, Measurement),
    field!("current", "Current", Some("mA"), &[&["current"]], Numeric, Measurement),
    field!("temp", "Chip Temperature", Some("°C"), &[&["temp"]], Numeric, Measurement),
    field!("vrTemp", "VR Temperature", Some("°C"), &[&["vrTemp"]], Numeric, Measurement),
    field!("maxPower", "Max Power", Some("W"), &[&["maxPower"]], Numeric, Diagnostic),
    field!("hashRate", "Current Hashrate", Some("H/s"), &[&["hashRate"]], Numeric, Measurement),
    field!(
        "expectedHashrate",
        "Expected Hashrate",
        Some("H/s"),
        &[&["expectedHashrate"]],
        Numeric,
        Diagnostic
    ),
    field!("bestDiff", "Best Difficulty", None, &[&["bestDiff"]], Text, Diagnostic),
    field!(
        "bestSessionDiff",
        "Best Session Difficulty",
        None,
        &[&["bestSessionDiff"]],
        Text,
        Diagnostic
    ),
    field!("poolDifficulty", "Pool Difficulty", None, &[&["poolDifficulty"]], Numeric, Diagnostic),
    field!("freeHeap", "Free Heap", Some("Bytes"), &[&["freeHeap"]], Numeric, Diagnostic),
    field!(
        "coreVoltage",
        "Core Voltage Target",
        Some("mV"),
        &[&["coreVoltage"]],
        Numeric,
        Config
    ),
    field!(
        "coreVoltageActual",
        "Core Voltage Actual",
        Some("mV"),
        &[&["coreVoltageActual"]],
        Numeric,
        Measurement
    ),
    field!("frequency", "Frequency", Some("MHz"), &[&["frequency"]], Numeric, Config),
    field!("ssid", "WiFi SSID", None, &[&["ssid"]], Text, Diagnostic),
    field!("macAddr", "MAC Address", None, &[&["macAddr"]], Text, Diagnostic),
    field!("hostname", "Hostname", None, &[&["hostname"]], Text, Diagnostic),
    field!("wifiStatus", "WiFi Status", None, &[&["wifiStatus"]], Text, Diagnostic),
    field!("wifiRSSI", "WiFi Signal Strength", Some("dBm"), &[&["wifiRSSI"]], Numeric, Diagnostic),
    field!("sharesAccepted", "Accepted Shares", None, &[&["sharesAccepted"]], Numeric, Measurement),
    field!("sharesRejected", "Rejected Shares", None, &[&["sharesRejected"]], Numeric, Measurement),
    field!("uptimeSeconds", "Uptime", Some("s"), &[&["uptimeSeconds"]], Numeric, Diagnostic),
    field!("smallCoreCount", "Total Core Count", None, &[&["smallCoreCount"]], Numeric, Diagnostic),
    field!("asicCount", "ASIC Count", None, &[&["asicCount"]], Numeric, Diagnostic),
    field!("ASICModel", "ASIC Model", None, &[&["ASICModel"]], Text, Diagnostic),
    field!("stratumURL", "Stratum URL", None, &[&["stratumURL"]], Text, Config),
    field!("stratumPort", "Stratum Port", None, &[&["stratumPort"]], Numeric, Config),
    field!("stratumUser", "Stratum User", None, &[&["stratumUser"]], Text, Config),
    field!(
        "pool_mode",
        "Pool Mode",
        None,
        &[&["stratum", "poolMode"], &["poolMode"]],
        Text,
        Config
    ),
    field!(
        "fallbackStratumURL",
        "Fallback Stratum URL",
        None,
        &[&["fallbackStratumURL"]],
        Text,
        Config
    ),
    field!("version", "Firmware Version", None, &[&["version"]], Text, Diagnostic),
    field!(
        "boardVersion",
        "Board Version",
        None,
        &[&["boardVersion"], &["deviceModel"]],
        Text,
        Diagnostic
    ),
    field!(
        "runningPartition",
        "Running Partition",
        None,
        &[&["runningPartition"]],
        Text,
        Diagnostic
    ),
    field!("overheat_mode", "Overheat Mode", None, &[&["overheat_mode"]], Boolean, Diagnostic),
    field!(
        "isUsingFallbackStratum",
        "Using Fallback Stratum",
        None,
        &[&["isUsingFallbackStratum"], &["stratum", "usingFallback"]],
        Boolean,
        Diagnostic
    ),
    field!("autofanspeed", "Auto Fan Speed", None, &[&["autofanspeed"]], Boolean, Config),
    field!(
        "invertfanpolarity",
        "Invert Fan Polarity",
        None,
        &[&["invertfanpolarity"]],
        Boolean,
        Config
    ),
    field!("flipscreen", "Flip Screen", None, &[&["flipscreen"]], Boolean, Config),
    field!("invertscreen", "Invert Screen", None, &[&["invertscreen"]], Boolean, Config),
    field!(
        "rotation",
        "Display Rotation",
        None,
        &[&["rotation"], &["flipscreen"]],
        Numeric,
        Config
    ),
    field!(
        "displayTimeout",
        "Display Timeout",
        Some("s"),
        &[&["displayTimeout"], &["autoscreenoff"]],
        Numeric,
        Config
    ),
    field!(
        "hideTempSensor",
        "Hide Temperature Sensor",
        None,
        &[&["hide_temp_sensor"], &["hide_temperature_sensors"]],
        Boolean,
        Config
    ),
    field!("fanspeed", "Fan Speed", Some("%"), &[&["fanspeed"]], Numeric, Measurement),
    field!("fanrpm", "Fan RPM", Some("RPM"), &[&["fanrpm"]], Numeric, Measurement),
    field!("temptarget", "Temperature Target", Some("°C"), &[&["temptarget"]], Numeric, Config),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_metric_keys_are_unique() {
        let mut seen = HashSet::new();
        for spec in TELEMETRY_SCHEMA {
            assert!(seen.insert(spec.key), "duplicate metric key: {}", spec.key);
        }
    }

    #[test]
    fn test_every_spec_has_at_least_one_path() {
        for spec in TELEMETRY_SCHEMA {
            assert!(!spec.paths.is_empty(), "no candidate paths for {}", spec.key);
            for path in spec.paths {
                assert!(!path.is_empty(), "empty candidate path for {}", spec.key);
            }
        }
    }
}
