//! Repository for the `rules` table and its target/condition bindings.

use std::collections::HashMap;

use sqlx::PgPool;

use mosaic_core::types::DbId;

use crate::models::rule::{
    CreateRule, CreateRuleCondition, CreateRuleTarget, Rule, RuleCondition, RuleTarget,
    RuleWithBindings, UpdateRule,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, layout_id, priority, enabled, comment, created_at, updated_at";

/// Provides CRUD operations for rules and their bindings.
pub struct RuleRepo;

impl RuleRepo {
    /// Insert a new rule.
    pub async fn create(pool: &PgPool, input: &CreateRule) -> Result<Rule, sqlx::Error> {
        let query = format!(
            "INSERT INTO rules (layout_id, priority, enabled, comment)
             VALUES ($1, COALESCE($2, 0), COALESCE($3, true), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rule>(&query)
            .bind(input.layout_id)
            .bind(input.priority)
            .bind(input.enabled)
            .bind(&input.comment)
            .fetch_one(pool)
            .await
    }

    /// Find a rule by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Rule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rules WHERE id = $1");
        sqlx::query_as::<_, Rule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all rules, highest priority first, id as tie-break.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Rule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rules ORDER BY priority DESC, id");
        sqlx::query_as::<_, Rule>(&query).fetch_all(pool).await
    }

    /// Update a rule. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRule,
    ) -> Result<Option<Rule>, sqlx::Error> {
        let query = format!(
            "UPDATE rules SET
                layout_id = COALESCE($2, layout_id),
                priority = COALESCE($3, priority),
                enabled = COALESCE($4, enabled),
                comment = COALESCE($5, comment),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rule>(&query)
            .bind(id)
            .bind(input.layout_id)
            .bind(input.priority)
            .bind(input.enabled)
            .bind(&input.comment)
            .fetch_optional(pool)
            .await
    }

    /// Delete a rule and (via cascade) its bindings. Returns `true` if a
    /// row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Bindings
    // -----------------------------------------------------------------------

    /// Attach a target to a rule.
    pub async fn add_target(
        pool: &PgPool,
        rule_id: DbId,
        input: &CreateRuleTarget,
    ) -> Result<RuleTarget, sqlx::Error> {
        sqlx::query_as::<_, RuleTarget>(
            "INSERT INTO rule_targets (rule_id, kind, config)
             VALUES ($1, $2, $3)
             RETURNING id, rule_id, kind, config",
        )
        .bind(rule_id)
        .bind(&input.kind)
        .bind(&input.config)
        .fetch_one(pool)
        .await
    }

    /// List a rule's targets.
    pub async fn list_targets(pool: &PgPool, rule_id: DbId) -> Result<Vec<RuleTarget>, sqlx::Error> {
        sqlx::query_as::<_, RuleTarget>(
            "SELECT id, rule_id, kind, config FROM rule_targets WHERE rule_id = $1 ORDER BY id",
        )
        .bind(rule_id)
        .fetch_all(pool)
        .await
    }

    /// Delete a target binding. Returns `true` if a row was deleted.
    pub async fn delete_target(
        pool: &PgPool,
        rule_id: DbId,
        target_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rule_targets WHERE id = $1 AND rule_id = $2")
            .bind(target_id)
            .bind(rule_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Attach a condition to a rule.
    pub async fn add_condition(
        pool: &PgPool,
        rule_id: DbId,
        input: &CreateRuleCondition,
    ) -> Result<RuleCondition, sqlx::Error> {
        sqlx::query_as::<_, RuleCondition>(
            "INSERT INTO rule_conditions (rule_id, kind, config)
             VALUES ($1, $2, $3)
             RETURNING id, rule_id, kind, config",
        )
        .bind(rule_id)
        .bind(&input.kind)
        .bind(&input.config)
        .fetch_one(pool)
        .await
    }

    /// List a rule's conditions.
    pub async fn list_conditions(
        pool: &PgPool,
        rule_id: DbId,
    ) -> Result<Vec<RuleCondition>, sqlx::Error> {
        sqlx::query_as::<_, RuleCondition>(
            "SELECT id, rule_id, kind, config FROM rule_conditions WHERE rule_id = $1 ORDER BY id",
        )
        .bind(rule_id)
        .fetch_all(pool)
        .await
    }

    /// Delete a condition binding. Returns `true` if a row was deleted.
    pub async fn delete_condition(
        pool: &PgPool,
        rule_id: DbId,
        condition_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rule_conditions WHERE id = $1 AND rule_id = $2")
            .bind(condition_id)
            .bind(rule_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Resolution support
    // -----------------------------------------------------------------------

    /// Load a single rule with its bindings.
    pub async fn find_with_bindings(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RuleWithBindings>, sqlx::Error> {
        let Some(rule) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let targets = Self::list_targets(pool, id).await?;
        let conditions = Self::list_conditions(pool, id).await?;
        Ok(Some(RuleWithBindings {
            rule,
            targets,
            conditions,
        }))
    }

    /// Load all enabled rules with their bindings, resolution order.
    ///
    /// Three queries total regardless of rule count; bindings are grouped
    /// in memory.
    pub async fn list_enabled_with_bindings(
        pool: &PgPool,
    ) -> Result<Vec<RuleWithBindings>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rules WHERE enabled = true ORDER BY priority DESC, id"
        );
        let rules = sqlx::query_as::<_, Rule>(&query).fetch_all(pool).await?;
        let ids: Vec<DbId> = rules.iter().map(|r| r.id).collect();

        let targets = sqlx::query_as::<_, RuleTarget>(
            "SELECT id, rule_id, kind, config FROM rule_targets
             WHERE rule_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let conditions = sqlx::query_as::<_, RuleCondition>(
            "SELECT id, rule_id, kind, config FROM rule_conditions
             WHERE rule_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut targets_by_rule: HashMap<DbId, Vec<RuleTarget>> = HashMap::new();
        for target in targets {
            targets_by_rule.entry(target.rule_id).or_default().push(target);
        }
        let mut conditions_by_rule: HashMap<DbId, Vec<RuleCondition>> = HashMap::new();
        for condition in conditions {
            conditions_by_rule
                .entry(condition.rule_id)
                .or_default()
                .push(condition);
        }

        Ok(rules
            .into_iter()
            .map(|rule| {
                let targets = targets_by_rule.remove(&rule.id).unwrap_or_default();
                let conditions = conditions_by_rule.remove(&rule.id).unwrap_or_default();
                RuleWithBindings {
                    rule,
                    targets,
                    conditions,
                }
            })
            .collect())
    }
}
