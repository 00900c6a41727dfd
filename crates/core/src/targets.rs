//! Target matchers — pure logic, no database access.
//!
//! A target classifies an incoming request attribute (path prefix, route
//! name, request attribute, tag, semantic class group) and compares it
//! against the value stored in the target's config. Targets are persisted as
//! a `kind` identifier plus a JSON config blob; matching dispatches on the
//! identifier. Unknown identifiers are a configuration error, not a silent
//! pass — a rule pointing at an unregistered matcher must surface loudly.

use serde_json::Value;

use crate::context::RequestContext;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Target kind identifiers
// ---------------------------------------------------------------------------

/// Matches when the request path info starts with the configured prefix.
pub const TARGET_PATH_INFO_PREFIX: &str = "path_info_prefix";
/// Matches the resolved route name exactly.
pub const TARGET_ROUTE: &str = "route";
/// Matches a named request attribute against a configured value.
pub const TARGET_REQUEST_ATTRIBUTE: &str = "request_attribute";
/// Matches when the configured tag is attached to the request.
pub const TARGET_TAG: &str = "tag";
/// Matches when the request's content belongs to the configured class group.
pub const TARGET_CLASS_GROUP: &str = "class_group";

/// All registered target kinds.
pub const VALID_TARGET_KINDS: &[&str] = &[
    TARGET_PATH_INFO_PREFIX,
    TARGET_ROUTE,
    TARGET_REQUEST_ATTRIBUTE,
    TARGET_TAG,
    TARGET_CLASS_GROUP,
];

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Evaluate a single target against the request context.
///
/// Returns the boolean match result, [`CoreError::TargetTypeNotFound`] for an
/// unregistered kind, or [`CoreError::Validation`] for a malformed config.
pub fn match_target(kind: &str, config: &Value, ctx: &RequestContext) -> Result<bool, CoreError> {
    match kind {
        TARGET_PATH_INFO_PREFIX => {
            let prefix = require_str(kind, config, "prefix")?;
            Ok(ctx.path_info.starts_with(prefix))
        }
        TARGET_ROUTE => {
            let route = require_str(kind, config, "route")?;
            Ok(ctx.route == route)
        }
        TARGET_REQUEST_ATTRIBUTE => {
            let name = require_str(kind, config, "name")?;
            let expected = config.get("value").ok_or_else(|| {
                CoreError::Validation(format!(
                    "Target config for \"{kind}\" is missing the 'value' key"
                ))
            })?;
            Ok(ctx.attributes.get(name) == Some(expected))
        }
        TARGET_TAG => {
            let tag = require_str(kind, config, "tag")?;
            Ok(ctx.tags.iter().any(|t| t == tag))
        }
        TARGET_CLASS_GROUP => {
            let group = require_str(kind, config, "group")?;
            Ok(ctx.class_groups.iter().any(|g| g == group))
        }
        other => Err(CoreError::TargetTypeNotFound(other.to_string())),
    }
}

/// Validate a target definition without a request context.
///
/// Used by the API at create/update time so misconfigured targets are
/// rejected with a 400 instead of failing every resolution with a 500.
pub fn validate_target(kind: &str, config: &Value) -> Result<(), CoreError> {
    match_target(kind, config, &RequestContext::default()).map(|_| ())
}

/// Extract a required string key from a target config.
fn require_str<'a>(kind: &str, config: &'a Value, key: &str) -> Result<&'a str, CoreError> {
    config.get(key).and_then(|v| v.as_str()).ok_or_else(|| {
        CoreError::Validation(format!(
            "Target config for \"{kind}\" is missing the '{key}' string key"
        ))
    })
}
