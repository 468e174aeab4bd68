use thiserror::Error;

/// Configuration errors raised while building scenes and levels.
///
/// These mean the level data or assets are malformed. They abort the scene
/// change that hit them and are not retried.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("no entity constructor registered for name {name:?} or type {kind:?}")]
    UnknownEntity { kind: String, name: Option<String> },
    #[error("level is missing required point of interest {0:?}")]
    MissingPointOfInterest(String),
    #[error("gate {gate:?} targets {target:?}, which matches no gate")]
    UnresolvedGate { gate: String, target: String },
    #[error("sound id {0:?} is not declared in the asset manifest")]
    MissingSound(String),
    #[error("sheet {0:?} has no image declared in the asset manifest")]
    MissingSheet(String),
    #[error("collision bitmap is {actual} bytes, expected {expected} for {width}x{height}")]
    InvalidCollisionMap {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("invalid property {property:?} on {entity:?}: {reason}")]
    InvalidProperty {
        entity: String,
        property: String,
        reason: String,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
