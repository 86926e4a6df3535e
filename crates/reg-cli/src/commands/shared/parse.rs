use serde::de::DeserializeOwned;

use crate::failure::Rejection;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> Result<T, Rejection>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json)
        .map_err(|error| Rejection::Invalid(format!("invalid {field} '{raw}': {error}")))
}

/// `parse_enum` for optional filter flags.
pub fn parse_opt_enum<T>(raw: Option<&str>, field: &str) -> Result<Option<T>, Rejection>
where
    T: DeserializeOwned,
{
    raw.map(|raw| parse_enum(raw, field)).transpose()
}
