use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Target matcher for \"{0}\" target type does not exist.")]
    TargetTypeNotFound(String),

    #[error("Condition matcher for \"{0}\" condition type does not exist.")]
    ConditionTypeNotFound(String),

    #[error("Value loader for \"{0}\" value type does not exist.")]
    ValueLoaderNotFound(String),

    #[error("Value converter for \"{0}\" value type does not exist.")]
    ValueConverterNotFound(String),

    #[error("Value URL generator for \"{0}\" value type does not exist.")]
    ValueUrlGeneratorNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
