//! Shared helpers for command handlers.

use std::str::FromStr;

use rokuly_core::{Device, Key, ParamValue, QueryParams, Selector};

use crate::error::CliError;

/// Parse repeated `key=value` arguments into ordered query params.
///
/// `true`/`false` become booleans and whole numbers become integers, the
/// rest is sent as a string.
pub fn parse_params(raw: &[String]) -> Result<QueryParams, CliError> {
    let mut params = QueryParams::new();
    for pair in raw {
        let (key, value) = pair.split_once('=').ok_or_else(|| CliError::Validation {
            field: "param".into(),
            reason: format!("expected KEY=VALUE, got '{pair}'"),
        })?;
        if key.is_empty() {
            return Err(CliError::Validation {
                field: "param".into(),
                reason: format!("empty key in '{pair}'"),
            });
        }
        params.insert(key, param_value(value));
    }
    Ok(params)
}

fn param_value(raw: &str) -> ParamValue {
    if let Ok(b) = raw.parse::<bool>() {
        ParamValue::Bool(b)
    } else if let Ok(n) = raw.parse::<i64>() {
        ParamValue::Integer(n)
    } else {
        ParamValue::String(raw.to_owned())
    }
}

/// Normalize a key argument: named keys match case-insensitively and are
/// sent in their canonical spelling, `Lit_` keys pass through.
pub fn resolve_key(raw: &str) -> Result<String, CliError> {
    if raw.starts_with("Lit_") {
        return Ok(raw.to_owned());
    }
    Key::from_str(raw)
        .map(|k| k.to_string())
        .map_err(|_| CliError::Validation {
            field: "key".into(),
            reason: format!("unknown key '{raw}' (run: rokuly keys)"),
        })
}

pub fn parse_selector(raw: &str) -> Result<Selector, CliError> {
    Ok(Selector::parse(raw)?)
}

/// The channel argument, else the profile's target channel.
pub fn channel_or_target(arg: Option<String>, device: &Device) -> Result<String, CliError> {
    arg.or_else(|| device.config().target_channel.clone())
        .ok_or_else(|| CliError::Validation {
            field: "channel".into(),
            reason: "no channel given and no target_channel in the profile (or ROKU_TARGET_CHANNEL)"
                .into(),
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn params_keep_order_and_infer_types() {
        let params = parse_params(&strings(&["start=30", "autoplay=true", "title=Big Buck"])).unwrap();
        assert_eq!(params.encode(), "start=30&autoplay=true&title=Big+Buck");
        let values: Vec<_> = params.iter().map(|(_, v)| v.clone()).collect();
        assert_eq!(
            values,
            vec![
                ParamValue::Integer(30),
                ParamValue::Bool(true),
                ParamValue::String("Big Buck".into()),
            ]
        );
    }

    #[test]
    fn value_may_contain_equals() {
        let params = parse_params(&strings(&["q=a=b"])).unwrap();
        assert_eq!(params.encode(), "q=a%3Db");
    }

    #[test]
    fn params_without_separator_are_rejected() {
        assert!(matches!(
            parse_params(&strings(&["start"])),
            Err(CliError::Validation { .. })
        ));
        assert!(matches!(
            parse_params(&strings(&["=1"])),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn keys_are_canonicalized() {
        assert_eq!(resolve_key("home").unwrap(), "Home");
        assert_eq!(resolve_key("instantreplay").unwrap(), "InstantReplay");
        assert_eq!(resolve_key("Lit_a").unwrap(), "Lit_a");
        assert!(resolve_key("Teleport").is_err());
    }

    #[test]
    fn bad_selector_maps_to_usage_error() {
        let err = parse_selector("[").unwrap_err();
        assert!(matches!(err, CliError::InvalidSelector { .. }));
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }
}
