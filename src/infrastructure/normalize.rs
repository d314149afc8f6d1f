// Payload normalization - resolves firmware-variant JSON into canonical records
use crate::domain::record::{CanonicalRecord, MetricValue};
use crate::domain::schema::{FieldSpec, ValueKind};
use serde_json::Value;

/// Try each candidate path in order and return the first value that
/// resolves. A multi-segment path requires every intermediate segment to be
/// an object; a wrong-shaped or missing intermediate skips that candidate
/// rather than failing the lookup.
pub fn resolve<'a>(payload: &'a Value, paths: &[&[&str]]) -> Option<&'a Value> {
    for path in paths {
        let mut current = payload;
        let mut matched = true;
        for segment in *path {
            match current.get(segment) {
                Some(next) => current = next,
                None => {
                    matched = false;
                    break;
                }
            }
        }
        if matched {
            return Some(current);
        }
    }
    None
}

/// Normalize the boolean encodings seen across AxeOS firmware variants.
/// Bools pass through; numerics are zero/nonzero; known strings map
/// case-insensitively. Numeric strings outside {"0","1"} follow the
/// zero/nonzero rule ("2" is true). Anything else is unknown, not an error.
pub fn coerce_boolean(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => {
            let lowered = s.trim().to_ascii_lowercase();
            match lowered.as_str() {
                "true" | "1" | "on" | "yes" => Some(true),
                "false" | "0" | "off" | "no" => Some(false),
                _ => lowered.parse::<f64>().ok().map(|f| f != 0.0),
            }
        }
        _ => None,
    }
}

fn scalar_value(raw: &Value) -> Option<MetricValue> {
    match raw {
        Value::Bool(b) => Some(MetricValue::Bool(*b)),
        Value::Number(n) => n.as_f64().map(MetricValue::Number),
        Value::String(s) => Some(MetricValue::Text(s.clone())),
        _ => None,
    }
}

/// Apply the schema to one raw payload. Total: every spec yields exactly one
/// entry, absent when its paths do not resolve or the value is not a usable
/// scalar. Specs are independent; no field can fail another's normalization.
pub fn normalize(payload: &Value, schema: &[FieldSpec]) -> CanonicalRecord {
    let mut record = CanonicalRecord::new();
    for spec in schema {
        let resolved = resolve(payload, spec.paths);
        let value = match (resolved, spec.kind) {
            (Some(raw), ValueKind::Boolean) => coerce_boolean(raw).map(MetricValue::Bool),
            (Some(raw), _) => scalar_value(raw),
            (None, _) => None,
        };
        record.insert(spec.key, value);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{Category, TELEMETRY_SCHEMA};
    use serde_json::json;

    fn spec(key: &'static str, paths: &'static [&'static [&'static str]], kind: ValueKind) -> FieldSpec {
        FieldSpec {
            key,
            label: key,
            unit: None,
            paths,
            kind,
            category: Category::Measurement,
        }
    }

    #[test]
    fn test_resolve_flat_key() {
        let payload = json!({"power": 12.5});
        assert_eq!(resolve(&payload, &[&["power"]]), Some(&json!(12.5)));
    }

    #[test]
    fn test_resolve_nested_path() {
        let payload = json!({"stratum": {"poolMode": "solo"}});
        let value = resolve(&payload, &[&["stratum", "poolMode"]]);
        assert_eq!(value, Some(&json!("solo")));
    }

    #[test]
    fn test_resolve_returns_none_on_empty_payload() {
        let payload = json!({});
        assert!(resolve(&payload, &[&["stratum", "poolMode"]]).is_none());
    }

    #[test]
    fn test_resolve_first_resolvable_candidate_wins() {
        // First two candidates are absent or ill-shaped, third resolves.
        let payload = json!({"stratum": 7, "deviceModel": "NerdAxe"});
        let paths: &[&[&str]] = &[&["boardVersion"], &["stratum", "model"], &["deviceModel"]];
        assert_eq!(resolve(&payload, paths), Some(&json!("NerdAxe")));
    }

    #[test]
    fn test_resolve_prefers_declaration_order_over_value() {
        let payload = json!({"boardVersion": "401", "deviceModel": "Gamma"});
        let paths: &[&[&str]] = &[&["boardVersion"], &["deviceModel"]];
        assert_eq!(resolve(&payload, paths), Some(&json!("401")));
    }

    #[test]
    fn test_resolve_skips_non_object_intermediate() {
        let payload = json!({"stratum": [1, 2, 3]});
        assert!(resolve(&payload, &[&["stratum", "usingFallback"]]).is_none());
    }

    #[test]
    fn test_coerce_boolean_passthrough() {
        assert_eq!(coerce_boolean(&json!(true)), Some(true));
        assert_eq!(coerce_boolean(&json!(false)), Some(false));
    }

    #[test]
    fn test_coerce_boolean_numeric() {
        assert_eq!(coerce_boolean(&json!(0)), Some(false));
        assert_eq!(coerce_boolean(&json!(1)), Some(true));
        assert_eq!(coerce_boolean(&json!(-3.5)), Some(true));
    }

    #[test]
    fn test_coerce_boolean_known_strings() {
        for s in ["true", "1", "on", "yes", "On", "YES"] {
            assert_eq!(coerce_boolean(&json!(s)), Some(true), "{s}");
        }
        for s in ["false", "0", "off", "no", "Off", "NO"] {
            assert_eq!(coerce_boolean(&json!(s)), Some(false), "{s}");
        }
    }

    #[test]
    fn test_coerce_boolean_numeric_string_follows_numeric_rule() {
        assert_eq!(coerce_boolean(&json!("2")), Some(true));
        assert_eq!(coerce_boolean(&json!("0.0")), Some(false));
    }

    #[test]
    fn test_coerce_boolean_unknown_is_absent() {
        assert_eq!(coerce_boolean(&json!("enabled")), None);
        assert_eq!(coerce_boolean(&json!(null)), None);
        assert_eq!(coerce_boolean(&json!([1])), None);
    }

    #[test]
    fn test_normalize_flat_payload() {
        let schema = [
            spec("power", &[&["power"]], ValueKind::Numeric),
            spec("hashRate", &[&["hashRate"]], ValueKind::Numeric),
        ];
        let record = normalize(&json!({"power": 12.5, "hashRate": 500}), &schema);

        assert_eq!(record.numeric("power"), Some(12.5));
        assert_eq!(record.numeric("hashRate"), Some(500.0));
    }

    #[test]
    fn test_normalize_is_total_over_empty_payload() {
        let record = normalize(&json!({}), TELEMETRY_SCHEMA);

        assert_eq!(record.len(), TELEMETRY_SCHEMA.len());
        for field in TELEMETRY_SCHEMA {
            assert!(record.contains_key(field.key), "missing entry for {}", field.key);
        }
        assert!(record.iter().all(|(_, value)| value.is_none()));
    }

    #[test]
    fn test_normalize_fields_are_independent() {
        let schema = [
            spec("temp", &[&["temp"]], ValueKind::Numeric),
            spec("broken", &[&["a", "b", "c"]], ValueKind::Numeric),
        ];
        let record = normalize(&json!({"temp": 61.2, "a": "not an object"}), &schema);

        assert_eq!(record.numeric("temp"), Some(61.2));
        assert!(record.get("broken").is_none());
    }

    #[test]
    fn test_normalize_rejects_nested_structures() {
        let schema = [spec("reasons", &[&["sharesRejectedReasons"]], ValueKind::Text)];
        let record = normalize(&json!({"sharesRejectedReasons": ["stale", "duplicate"]}), &schema);

        assert!(record.contains_key("reasons"));
        assert!(record.get("reasons").is_none());
    }

    #[test]
    fn test_normalize_coerces_boolean_kind() {
        let schema = [
            spec("overheat_mode", &[&["overheat_mode"]], ValueKind::Boolean),
            spec("autofanspeed", &[&["autofanspeed"]], ValueKind::Boolean),
        ];
        let record = normalize(&json!({"overheat_mode": "On", "autofanspeed": 0}), &schema);

        assert_eq!(record.get("overheat_mode"), Some(&MetricValue::Bool(true)));
        assert_eq!(record.get("autofanspeed"), Some(&MetricValue::Bool(false)));
    }

    #[test]
    fn test_normalize_nested_fallback_path() {
        let schema = [spec(
            "isUsingFallbackStratum",
            &[&["isUsingFallbackStratum"], &["stratum", "usingFallback"]],
            ValueKind::Boolean,
        )];
        let record = normalize(&json!({"stratum": {"usingFallback": true}}), &schema);

        assert_eq!(record.get("isUsingFallbackStratum"), Some(&MetricValue::Bool(true)));
    }
}
