//! Rule resolution — selects the layout rule that applies to a request.
//!
//! A rule matches when every condition evaluates true and at least one of its
//! configured targets matches. Among matching rules the highest priority
//! wins; equal priorities break ties by ascending rule id, which makes
//! resolution deterministic across requests and deployments.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conditions::match_condition;
use crate::context::RequestContext;
use crate::error::CoreError;
use crate::targets::match_target;
use crate::types::{DbId, Timestamp};

/// A stored target binding in matcher form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSnapshot {
    pub kind: String,
    pub config: Value,
}

/// A stored condition binding in matcher form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionSnapshot {
    pub kind: String,
    pub config: Value,
}

/// A rule with its bindings loaded, detached from the database so the
/// resolver stays pure and testable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSnapshot {
    pub id: DbId,
    pub layout_id: Option<DbId>,
    pub priority: i32,
    pub enabled: bool,
    pub targets: Vec<TargetSnapshot>,
    pub conditions: Vec<ConditionSnapshot>,
}

/// Check whether a single rule matches the request context.
///
/// Disabled rules and rules without targets never match. A rule without
/// conditions passes the condition check vacuously.
pub fn rule_matches(
    rule: &RuleSnapshot,
    ctx: &RequestContext,
    now: Timestamp,
) -> Result<bool, CoreError> {
    if !rule.enabled || rule.targets.is_empty() {
        return Ok(false);
    }

    for condition in &rule.conditions {
        if !match_condition(&condition.kind, &condition.config, ctx, now)? {
            return Ok(false);
        }
    }

    for target in &rule.targets {
        if match_target(&target.kind, &target.config, ctx)? {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Resolve the best matching rule for the request, or `None` when nothing
/// matches and the caller should fall back to its default layout.
pub fn resolve<'a>(
    rules: &'a [RuleSnapshot],
    ctx: &RequestContext,
    now: Timestamp,
) -> Result<Option<&'a RuleSnapshot>, CoreError> {
    let mut best: Option<&RuleSnapshot> = None;

    for rule in rules {
        if !rule_matches(rule, ctx, now)? {
            continue;
        }
        best = match best {
            Some(current)
                if (current.priority, std::cmp::Reverse(current.id))
                    >= (rule.priority, std::cmp::Reverse(rule.id)) =>
            {
                Some(current)
            }
            _ => Some(rule),
        };
    }

    Ok(best)
}
