//! Rule, target, and condition entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use mosaic_core::resolver::{ConditionSnapshot, RuleSnapshot, TargetSnapshot};
use mosaic_core::types::{DbId, Timestamp};

/// A row from the `rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rule {
    pub id: DbId,
    pub layout_id: Option<DbId>,
    pub priority: i32,
    pub enabled: bool,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `rule_targets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RuleTarget {
    pub id: DbId,
    pub rule_id: DbId,
    pub kind: String,
    pub config: serde_json::Value,
}

/// A row from the `rule_conditions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RuleCondition {
    pub id: DbId,
    pub rule_id: DbId,
    pub kind: String,
    pub config: serde_json::Value,
}

/// A rule together with its target and condition bindings.
#[derive(Debug, Clone, Serialize)]
pub struct RuleWithBindings {
    #[serde(flatten)]
    pub rule: Rule,
    pub targets: Vec<RuleTarget>,
    pub conditions: Vec<RuleCondition>,
}

impl RuleWithBindings {
    /// Detach into the matcher-facing shape the resolver consumes.
    pub fn to_snapshot(&self) -> RuleSnapshot {
        RuleSnapshot {
            id: self.rule.id,
            layout_id: self.rule.layout_id,
            priority: self.rule.priority,
            enabled: self.rule.enabled,
            targets: self
                .targets
                .iter()
                .map(|t| TargetSnapshot {
                    kind: t.kind.clone(),
                    config: t.config.clone(),
                })
                .collect(),
            conditions: self
                .conditions
                .iter()
                .map(|c| ConditionSnapshot {
                    kind: c.kind.clone(),
                    config: c.config.clone(),
                })
                .collect(),
        }
    }
}

/// DTO for creating a new rule.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRule {
    pub layout_id: Option<DbId>,
    pub priority: Option<i32>,
    pub enabled: Option<bool>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// DTO for updating a rule. All fields optional; `layout_id` and `comment`
/// cannot be cleared through this DTO.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRule {
    pub layout_id: Option<DbId>,
    pub priority: Option<i32>,
    pub enabled: Option<bool>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// DTO for attaching a target to a rule.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRuleTarget {
    pub kind: String,
    pub config: serde_json::Value,
}

/// DTO for attaching a condition to a rule.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRuleCondition {
    pub kind: String,
    pub config: serde_json::Value,
}
