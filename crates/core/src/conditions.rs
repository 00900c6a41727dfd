//! Condition matchers — pure logic, no database access.
//!
//! A condition is a boolean predicate over a value already extracted from the
//! request context (route parameter, request attribute, current time,
//! semantic class groups). Conditions are persisted as a `kind` identifier
//! plus a JSON config blob, mirroring targets.

use serde_json::Value;

use crate::context::RequestContext;
use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Condition kind identifiers
// ---------------------------------------------------------------------------

/// Route parameter set membership.
pub const CONDITION_ROUTE_PARAMETER: &str = "route_parameter";
/// Request attribute set membership or regex pattern match.
pub const CONDITION_REQUEST_ATTRIBUTE: &str = "request_attribute";
/// Current time falls within a half-open interval.
pub const CONDITION_TIME_INTERVAL: &str = "time_interval";
/// Any of the configured class groups applies to the request.
pub const CONDITION_CLASS_GROUP: &str = "class_group";

/// All registered condition kinds.
pub const VALID_CONDITION_KINDS: &[&str] = &[
    CONDITION_ROUTE_PARAMETER,
    CONDITION_REQUEST_ATTRIBUTE,
    CONDITION_TIME_INTERVAL,
    CONDITION_CLASS_GROUP,
];

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Evaluate a single condition against the request context at `now`.
///
/// Returns the boolean match result, [`CoreError::ConditionTypeNotFound`] for
/// an unregistered kind, or [`CoreError::Validation`] for a malformed config.
pub fn match_condition(
    kind: &str,
    config: &Value,
    ctx: &RequestContext,
    now: Timestamp,
) -> Result<bool, CoreError> {
    match kind {
        CONDITION_ROUTE_PARAMETER => {
            let parameter = require_str(kind, config, "parameter")?;
            let values = require_string_array(kind, config, "values")?;
            Ok(ctx
                .route_params
                .get(parameter)
                .is_some_and(|v| values.iter().any(|allowed| allowed == v)))
        }
        CONDITION_REQUEST_ATTRIBUTE => {
            let name = require_str(kind, config, "name")?;
            let attribute = ctx.attributes.get(name);

            if let Some(values) = config.get("values") {
                let values = values.as_array().ok_or_else(|| {
                    CoreError::Validation(format!(
                        "Condition config for \"{kind}\" has a non-array 'values' key"
                    ))
                })?;
                return Ok(attribute.is_some_and(|v| values.contains(v)));
            }

            if let Some(pattern) = config.get("pattern") {
                let pattern = pattern.as_str().ok_or_else(|| {
                    CoreError::Validation(format!(
                        "Condition config for \"{kind}\" has a non-string 'pattern' key"
                    ))
                })?;
                let re = regex::Regex::new(pattern).map_err(|e| {
                    CoreError::Validation(format!(
                        "Condition config for \"{kind}\" has an invalid pattern: {e}"
                    ))
                })?;
                return Ok(attribute
                    .and_then(|v| v.as_str())
                    .is_some_and(|s| re.is_match(s)));
            }

            Err(CoreError::Validation(format!(
                "Condition config for \"{kind}\" needs a 'values' or 'pattern' key"
            )))
        }
        CONDITION_TIME_INTERVAL => {
            let from = parse_optional_timestamp(kind, config, "from")?;
            let to = parse_optional_timestamp(kind, config, "to")?;
            // Half-open interval: `from` inclusive, `to` exclusive.
            let after_from = from.is_none_or(|f| now >= f);
            let before_to = to.is_none_or(|t| now < t);
            Ok(after_from && before_to)
        }
        CONDITION_CLASS_GROUP => {
            let groups = require_string_array(kind, config, "groups")?;
            Ok(groups
                .iter()
                .any(|g| ctx.class_groups.iter().any(|have| have == g)))
        }
        other => Err(CoreError::ConditionTypeNotFound(other.to_string())),
    }
}

/// Validate a condition definition without a request context.
pub fn validate_condition(kind: &str, config: &Value) -> Result<(), CoreError> {
    match_condition(kind, config, &RequestContext::default(), chrono::Utc::now()).map(|_| ())
}

fn require_str<'a>(kind: &str, config: &'a Value, key: &str) -> Result<&'a str, CoreError> {
    config.get(key).and_then(|v| v.as_str()).ok_or_else(|| {
        CoreError::Validation(format!(
            "Condition config for \"{kind}\" is missing the '{key}' string key"
        ))
    })
}

fn require_string_array(kind: &str, config: &Value, key: &str) -> Result<Vec<String>, CoreError> {
    let values = config.get(key).and_then(|v| v.as_array()).ok_or_else(|| {
        CoreError::Validation(format!(
            "Condition config for \"{kind}\" is missing the '{key}' array key"
        ))
    })?;
    values
        .iter()
        .map(|v| {
            v.as_str().map(|s| s.to_string()).ok_or_else(|| {
                CoreError::Validation(format!(
                    "Condition config for \"{kind}\" has non-string entries in '{key}'"
                ))
            })
        })
        .collect()
}

fn parse_optional_timestamp(
    kind: &str,
    config: &Value,
    key: &str,
) -> Result<Option<Timestamp>, CoreError> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => {
            let raw = v.as_str().ok_or_else(|| {
                CoreError::Validation(format!(
                    "Condition config for \"{kind}\" has a non-string '{key}' key"
                ))
            })?;
            let parsed = chrono::DateTime::parse_from_rfc3339(raw).map_err(|e| {
                CoreError::Validation(format!(
                    "Condition config for \"{kind}\" has an invalid '{key}' timestamp: {e}"
                ))
            })?;
            Ok(Some(parsed.with_timezone(&chrono::Utc)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use serde_json::json;

    fn ctx() -> RequestContext {
        let mut ctx = RequestContext::for_path("/articles/42");
        ctx.route = "cms_article_view".to_string();
        ctx.route_params
            .insert("id".to_string(), "42".to_string());
        ctx.attributes
            .insert("site".to_string(), json!("intranet"));
        ctx.attributes
            .insert("locale".to_string(), json!("en_GB"));
        ctx.class_groups = vec!["editorial".to_string()];
        ctx
    }

    fn noon() -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn route_parameter_membership() {
        let config = json!({"parameter": "id", "values": ["41", "42"]});
        assert_matches!(
            match_condition(CONDITION_ROUTE_PARAMETER, &config, &ctx(), noon()),
            Ok(true)
        );

        let config = json!({"parameter": "id", "values": ["7"]});
        assert_matches!(
            match_condition(CONDITION_ROUTE_PARAMETER, &config, &ctx(), noon()),
            Ok(false)
        );
    }

    #[test]
    fn route_parameter_missing_parameter_does_not_match() {
        let config = json!({"parameter": "page", "values": ["1"]});
        assert_matches!(
            match_condition(CONDITION_ROUTE_PARAMETER, &config, &ctx(), noon()),
            Ok(false)
        );
    }

    #[test]
    fn request_attribute_values_membership() {
        let config = json!({"name": "site", "values": ["intranet", "extranet"]});
        assert_matches!(
            match_condition(CONDITION_REQUEST_ATTRIBUTE, &config, &ctx(), noon()),
            Ok(true)
        );
    }

    #[test]
    fn request_attribute_pattern_match() {
        let config = json!({"name": "locale", "pattern": "^en_"});
        assert_matches!(
            match_condition(CONDITION_REQUEST_ATTRIBUTE, &config, &ctx(), noon()),
            Ok(true)
        );

        let config = json!({"name": "locale", "pattern": "^fr_"});
        assert_matches!(
            match_condition(CONDITION_REQUEST_ATTRIBUTE, &config, &ctx(), noon()),
            Ok(false)
        );
    }

    #[test]
    fn request_attribute_needs_values_or_pattern() {
        let config = json!({"name": "locale"});
        assert_matches!(
            match_condition(CONDITION_REQUEST_ATTRIBUTE, &config, &ctx(), noon()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn time_interval_within_bounds() {
        let config = json!({"from": "2024-03-01T00:00:00Z", "to": "2024-04-01T00:00:00Z"});
        assert_matches!(
            match_condition(CONDITION_TIME_INTERVAL, &config, &ctx(), noon()),
            Ok(true)
        );
    }

    #[test]
    fn time_interval_from_is_inclusive_to_is_exclusive() {
        let config = json!({"from": "2024-03-15T12:00:00Z"});
        assert_matches!(
            match_condition(CONDITION_TIME_INTERVAL, &config, &ctx(), noon()),
            Ok(true)
        );

        let config = json!({"to": "2024-03-15T12:00:00Z"});
        assert_matches!(
            match_condition(CONDITION_TIME_INTERVAL, &config, &ctx(), noon()),
            Ok(false)
        );
    }

    #[test]
    fn time_interval_open_bounds_always_match() {
        assert_matches!(
            match_condition(CONDITION_TIME_INTERVAL, &json!({}), &ctx(), noon()),
            Ok(true)
        );
    }

    #[test]
    fn class_group_overlap() {
        let config = json!({"groups": ["editorial", "marketing"]});
        assert_matches!(
            match_condition(CONDITION_CLASS_GROUP, &config, &ctx(), noon()),
            Ok(true)
        );

        let config = json!({"groups": ["marketing"]});
        assert_matches!(
            match_condition(CONDITION_CLASS_GROUP, &config, &ctx(), noon()),
            Ok(false)
        );
    }

    #[test]
    fn unknown_kind_is_configuration_error() {
        let err = match_condition("moon_phase", &json!({}), &ctx(), noon()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Condition matcher for \"moon_phase\" condition type does not exist."
        );
    }

    #[test]
    fn invalid_timestamp_is_validation_error() {
        let config = json!({"from": "next tuesday"});
        assert_matches!(
            match_condition(CONDITION_TIME_INTERVAL, &config, &ctx(), noon()),
            Err(CoreError::Validation(_))
        );
    }
}
