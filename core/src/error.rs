use thiserror::Error;

#[derive(Error, Debug)]
pub enum FadeError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown setting '{key}'")]
    UnknownSetting { key: String },

    #[error("Unknown occlusion mode code {code}")]
    UnknownOcclusionMode { code: i64 },

    #[error("Tile '{tile_id}' rejected update: {reason}")]
    UpdateRejected { tile_id: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type FadeResult<T> = Result<T, FadeError>;
