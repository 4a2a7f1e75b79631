//! Tolerant field decoders for hand-maintained catalog files, where a number may be
//! written as a JSON number, a numeric string, an empty string or `null`.
use serde::{de::IgnoredAny, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
    Flag(bool),
    Other(IgnoredAny),
}

/// Decode an optional number. Anything that does not read as a finite number is `None`.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Number(n)) => Some(n),
        Some(Loose::Text(s)) => parse_number(&s),
        _ => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}

/// Decode an optional text field, accepting scalars of any type. Blank text is `None`.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(s)) if !s.trim().is_empty() => Some(s),
        Some(Loose::Number(n)) => Some(n.to_string()),
        Some(Loose::Flag(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok()
}
