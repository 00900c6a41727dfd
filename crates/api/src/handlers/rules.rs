//! Handlers for layout resolution rules and their bindings.
//!
//! Target and condition definitions are validated at create time so a
//! misconfigured binding is rejected with a 400 instead of poisoning every
//! later resolution with a 500.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use mosaic_core::context::RequestContext;
use mosaic_core::error::CoreError;
use mosaic_core::resolver;
use mosaic_core::types::DbId;
use mosaic_core::{conditions, targets};
use mosaic_db::models::rule::{CreateRule, CreateRuleCondition, CreateRuleTarget, UpdateRule};
use mosaic_db::repositories::{LayoutRepo, RuleRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a rule exists.
async fn ensure_rule_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<()> {
    RuleRepo::find_by_id(pool, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Rule", id }))
}

/// Verify that a referenced layout exists before binding a rule to it.
async fn ensure_layout_exists(pool: &sqlx::PgPool, layout_id: Option<DbId>) -> AppResult<()> {
    if let Some(id) = layout_id {
        LayoutRepo::find_by_id(pool, id).await?.ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Layout",
                id,
            })
        })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GET /rules
// ---------------------------------------------------------------------------

/// List all rules in resolution order.
pub async fn list_rules(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = RuleRepo::list_all(&state.pool).await?;
    tracing::debug!(count = items.len(), "Listed rules");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /rules
// ---------------------------------------------------------------------------

/// Create a new rule.
pub async fn create_rule(
    State(state): State<AppState>,
    Json(input): Json<CreateRule>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_layout_exists(&state.pool, input.layout_id).await?;

    let created = RuleRepo::create(&state.pool, &input).await?;
    tracing::info!(id = created.id, priority = created.priority, "Rule created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /rules/{id}
// ---------------------------------------------------------------------------

/// Get a rule with its targets and conditions.
pub async fn get_rule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let rule = RuleRepo::find_with_bindings(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Rule", id })?;
    Ok(Json(DataResponse { data: rule }))
}

// ---------------------------------------------------------------------------
// PUT /rules/{id}
// ---------------------------------------------------------------------------

/// Update a rule's priority, enabled flag, layout, or comment.
pub async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRule>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_layout_exists(&state.pool, input.layout_id).await?;

    let updated = RuleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Rule", id })?;
    tracing::info!(id = updated.id, "Rule updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /rules/{id}
// ---------------------------------------------------------------------------

/// Delete a rule and its bindings.
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !RuleRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "Rule", id }.into());
    }
    tracing::info!(id, "Rule deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /rules/{id}/targets
// ---------------------------------------------------------------------------

/// Attach a target to a rule.
pub async fn add_target(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateRuleTarget>,
) -> AppResult<impl IntoResponse> {
    ensure_rule_exists(&state.pool, id).await?;
    // Unknown kinds and malformed configs are client errors here, not the
    // configuration errors they would become at resolve time.
    targets::validate_target(&input.kind, &input.config)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let created = RuleRepo::add_target(&state.pool, id, &input).await?;
    tracing::info!(rule_id = id, target_id = created.id, kind = %created.kind, "Target added");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// DELETE /rules/{id}/targets/{target_id}
// ---------------------------------------------------------------------------

/// Detach a target from a rule.
pub async fn delete_target(
    State(state): State<AppState>,
    Path((id, target_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    if !RuleRepo::delete_target(&state.pool, id, target_id).await? {
        return Err(CoreError::NotFound {
            entity: "Target",
            id: target_id,
        }
        .into());
    }
    tracing::info!(rule_id = id, target_id, "Target removed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /rules/{id}/conditions
// ---------------------------------------------------------------------------

/// Attach a condition to a rule.
pub async fn add_condition(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateRuleCondition>,
) -> AppResult<impl IntoResponse> {
    ensure_rule_exists(&state.pool, id).await?;
    conditions::validate_condition(&input.kind, &input.config)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let created = RuleRepo::add_condition(&state.pool, id, &input).await?;
    tracing::info!(rule_id = id, condition_id = created.id, kind = %created.kind, "Condition added");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// DELETE /rules/{id}/conditions/{condition_id}
// ---------------------------------------------------------------------------

/// Detach a condition from a rule.
pub async fn delete_condition(
    State(state): State<AppState>,
    Path((id, condition_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    if !RuleRepo::delete_condition(&state.pool, id, condition_id).await? {
        return Err(CoreError::NotFound {
            entity: "Condition",
            id: condition_id,
        }
        .into());
    }
    tracing::info!(rule_id = id, condition_id, "Condition removed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /rules/resolve
// ---------------------------------------------------------------------------

/// Resolve the best matching rule for a request context.
///
/// Returns the matched rule with its bindings, or `null` when nothing
/// matches and the caller should fall back to its default layout.
pub async fn resolve(
    State(state): State<AppState>,
    Json(ctx): Json<RequestContext>,
) -> AppResult<impl IntoResponse> {
    let rules = RuleRepo::list_enabled_with_bindings(&state.pool).await?;
    let snapshots: Vec<_> = rules.iter().map(|r| r.to_snapshot()).collect();

    let resolved = resolver::resolve(&snapshots, &ctx, chrono::Utc::now())?;
    let matched_id = resolved.map(|snapshot| snapshot.id);
    let matched = matched_id.and_then(|id| rules.into_iter().find(|r| r.rule.id == id));

    match &matched {
        Some(rule) => {
            tracing::debug!(rule_id = rule.rule.id, "Rule resolved");
        }
        None => {
            tracing::debug!(path_info = %ctx.path_info, "No rule matched");
        }
    }
    Ok(Json(DataResponse { data: matched }))
}
