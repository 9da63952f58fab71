use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Contact fields as sent to `POST /api/contacts/` and `PUT /api/contacts/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub city: String,
    /// Status id; `None` serializes as `null` when the control held no number.
    pub status: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parses the leading integer of a control value: surrounding whitespace and
/// a sign are accepted, trailing garbage is ignored, no digits means `None`.
pub fn parse_status(value: &str) -> Option<i64> {
    let s = value.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return None;
    }

    let n: i64 = digits.parse().ok()?;
    Some(if negative { -n } else { n })
}

/// Display strings for the three weather slots of a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherReading {
    pub temperature: String,
    pub humidity: String,
    pub wind_speed: String,
    pub temperature_unit: Option<String>,
    pub humidity_unit: Option<String>,
    pub wind_speed_unit: Option<String>,
}

pub const NOT_AVAILABLE: &str = "N/A";

impl WeatherReading {
    /// Extracts the reading from a `/weather/{city}/` payload. Returns `None`
    /// when the payload has no usable `weather` member.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let weather = payload.get("weather").filter(|w| is_present(w))?;

        let text = |key: &str| {
            weather
                .get(key)
                .and_then(display_value)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };
        let unit = |key: &str| weather.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            temperature: text("temperature"),
            humidity: text("humidity"),
            wind_speed: text("wind_speed"),
            temperature_unit: unit("temperature_unit"),
            humidity_unit: unit("humidity_unit"),
            wind_speed_unit: unit("wind_speed_unit"),
        })
    }
}

/// Truthiness as the page scripts see it: `null`, `false`, `0` and `""` are
/// all absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match n.as_f64() {
            // 21.0 reads as "21", the way a browser prints numbers.
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        }),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_status_follows_integer_prefix_rules() {
        assert_eq!(parse_status("3"), Some(3));
        assert_eq!(parse_status("  12abc"), Some(12));
        assert_eq!(parse_status("-4"), Some(-4));
        assert_eq!(parse_status(""), None);
        assert_eq!(parse_status("abc"), None);
        assert_eq!(parse_status("-"), None);
    }

    #[test]
    fn contact_without_status_serializes_null() {
        let contact = Contact { first_name: "Jan".into(), ..Default::default() };
        let value = serde_json::to_value(&contact).expect("serialize");

        assert_eq!(value["status"], Value::Null);
        assert_eq!(value["first_name"], "Jan");
    }

    #[test]
    fn contact_fields_keep_declaration_order() {
        let contact = Contact::default();
        let text = serde_json::to_string(&contact).expect("serialize");
        assert!(text.starts_with(r#"{"first_name":"","last_name":"","email""#));
    }

    #[test]
    fn status_accepts_missing_description() {
        let status: Status = serde_json::from_value(json!({"id": 1, "name": "new"})).unwrap();
        assert_eq!(status.description, None);
    }

    #[test]
    fn reading_uses_values_and_units_from_payload() {
        let payload = json!({
            "city": "Warsaw",
            "weather": {
                "temperature": 21.0,
                "temperature_unit": "°C",
                "humidity": 64,
                "wind_speed": 12.5
            }
        });

        let reading = WeatherReading::from_payload(&payload).expect("reading");
        assert_eq!(reading.temperature, "21");
        assert_eq!(reading.humidity, "64");
        assert_eq!(reading.wind_speed, "12.5");
        assert_eq!(reading.temperature_unit.as_deref(), Some("°C"));
        assert_eq!(reading.humidity_unit, None);
    }

    #[test]
    fn missing_or_null_fields_render_not_available() {
        let payload = json!({"weather": {"temperature": null}});

        let reading = WeatherReading::from_payload(&payload).expect("reading");
        assert_eq!(reading.temperature, NOT_AVAILABLE);
        assert_eq!(reading.humidity, NOT_AVAILABLE);
        assert_eq!(reading.wind_speed, NOT_AVAILABLE);
    }

    #[test]
    fn zero_is_a_reading_not_a_gap() {
        let payload = json!({"weather": {"temperature": 0, "humidity": 0.0, "wind_speed": 3}});

        let reading = WeatherReading::from_payload(&payload).expect("reading");
        assert_eq!(reading.temperature, "0");
        assert_eq!(reading.humidity, "0");
    }

    #[test]
    fn payload_without_weather_has_no_reading() {
        assert_eq!(WeatherReading::from_payload(&json!({"error": "City not found"})), None);
        assert_eq!(WeatherReading::from_payload(&json!({"weather": null})), None);
        assert_eq!(WeatherReading::from_payload(&json!([])), None);
    }

    #[test]
    fn falsy_weather_member_has_no_reading() {
        assert_eq!(WeatherReading::from_payload(&json!({"weather": 0})), None);
        assert_eq!(WeatherReading::from_payload(&json!({"weather": 0.0})), None);
        assert_eq!(WeatherReading::from_payload(&json!({"weather": ""})), None);
        assert_eq!(WeatherReading::from_payload(&json!({"weather": false})), None);
        assert!(WeatherReading::from_payload(&json!({"weather": {}})).is_some());
    }

    #[test]
    fn false_field_renders_not_available() {
        let payload = json!({"weather": {"temperature": false, "humidity": true}});

        let reading = WeatherReading::from_payload(&payload).expect("reading");
        assert_eq!(reading.temperature, NOT_AVAILABLE);
        assert_eq!(reading.humidity, "true");
    }
}
