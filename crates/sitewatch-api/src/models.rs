// Wire types for the site status endpoint.
//
// The endpoint returns a flat JSON array of per-site objects. Status
// columns are loosely typed: the same field may hold `1`, `true`,
// `"1"`, `"true"` or `null` depending on the producer, so they are kept
// as `LooseValue` and interpreted later by sitewatch-core.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ── LooseValue ──────────────────────────────────────────────────────

/// A scalar whose JSON type is not fixed by the endpoint.
///
/// `null` and absent fields are represented by the surrounding
/// `Option`, never by a variant here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl LooseValue {
    /// Scripting-language truthiness: `false`, `0`, `NaN` and `""` are
    /// falsy, everything else (including the string `"0"`) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(f) => *f != 0.0 && !f.is_nan(),
            Self::Text(s) => !s.is_empty(),
            Self::Other(_) => true,
        }
    }

    /// `true` only for the boolean `true` itself.
    pub fn is_bool_true(&self) -> bool {
        matches!(self, Self::Bool(true))
    }
}

impl fmt::Display for LooseValue {
    /// Scripting-language stringification (`1.0` prints as `1`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) if x.is_nan() => f.write_str("NaN"),
            Self::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Self::Float(x) if *x == 0.0 => f.write_str("0"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Other(serde_json::Value::Array(items)) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|v| match v {
                        serde_json::Value::String(s) => s.clone(),
                        serde_json::Value::Null => String::new(),
                        other => other.to_string(),
                    })
                    .collect();
                f.write_str(&parts.join(","))
            }
            Self::Other(serde_json::Value::Object(_)) => f.write_str("[object Object]"),
            Self::Other(other) => write!(f, "{other}"),
        }
    }
}

impl From<bool> for LooseValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for LooseValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for LooseValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

// ── SiteStatusRecord ────────────────────────────────────────────────

/// One row of the `SiteIPStatus` payload, exactly as the endpoint sends it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteStatusRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub site_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub site_code: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gateway_type: String,

    pub aggregator_ip: Option<String>,
    pub aggregator_status: Option<LooseValue>,
    pub aggregator_pinged_on: Option<String>,

    pub cabina_controller_ip: Option<String>,
    pub cabina_controller_status: Option<LooseValue>,
    pub cabina_pinged_on: Option<String>,

    pub cabinb_controller_ip: Option<String>,
    pub cabinb_controller_status: Option<LooseValue>,
    pub cabinb_pinged_on: Option<String>,

    pub router_ip: Option<String>,
    pub router_status: Option<LooseValue>,
    pub router_pinged_on: Option<String>,

    pub poc3_ip: Option<String>,
    pub poc3_status: Option<LooseValue>,
    pub poc3_pinged_on: Option<String>,

    /// Heartbeat flag reported by the aggregator itself.
    pub aggregator_alive_status: Option<LooseValue>,
    pub aggregator_hash_key: Option<String>,
    pub aggregator_alive_last_received_on: Option<String>,
    pub aggregator_device_id: Option<LooseValue>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loose_values_deserialize_by_shape() {
        let values: Vec<LooseValue> =
            serde_json::from_value(json!([true, 1, 0.5, "1", {"a": 1}])).unwrap();
        assert_eq!(values[0], LooseValue::Bool(true));
        assert_eq!(values[1], LooseValue::Int(1));
        assert_eq!(values[2], LooseValue::Float(0.5));
        assert_eq!(values[3], LooseValue::Text("1".into()));
        assert!(matches!(values[4], LooseValue::Other(_)));
    }

    #[test]
    fn truthiness_follows_script_rules() {
        assert!(LooseValue::Int(1).is_truthy());
        assert!(!LooseValue::Int(0).is_truthy());
        assert!(!LooseValue::Bool(false).is_truthy());
        assert!(!LooseValue::Text(String::new()).is_truthy());
        assert!(LooseValue::Text("0".into()).is_truthy());
        assert!(LooseValue::Text("false".into()).is_truthy());
        assert!(!LooseValue::Float(f64::NAN).is_truthy());
    }

    #[test]
    fn display_matches_script_stringification() {
        assert_eq!(LooseValue::Bool(true).to_string(), "true");
        assert_eq!(LooseValue::Int(1).to_string(), "1");
        assert_eq!(LooseValue::Float(1.0).to_string(), "1");
        assert_eq!(LooseValue::Float(2.5).to_string(), "2.5");
        assert_eq!(LooseValue::Float(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(LooseValue::Text(" True ".into()).to_string(), " True ");
        assert_eq!(
            LooseValue::Other(json!({"k": "v"})).to_string(),
            "[object Object]"
        );
    }

    #[test]
    fn record_tolerates_nulls_and_missing_fields() {
        let record: SiteStatusRecord = serde_json::from_value(json!({
            "site_name": null,
            "site_code": "S-01",
            "gateway_type": "4G",
            "aggregator_ip": "10.0.0.1",
            "aggregator_status": 1,
            "router_status": null,
            "aggregator_alive_status": "true"
        }))
        .unwrap();

        assert_eq!(record.site_name, "");
        assert_eq!(record.site_code, "S-01");
        assert_eq!(record.aggregator_status, Some(LooseValue::Int(1)));
        assert_eq!(record.router_status, None);
        assert_eq!(record.poc3_ip, None);
        assert_eq!(
            record.aggregator_alive_status,
            Some(LooseValue::Text("true".into()))
        );
    }
}
