use thiserror::Error;

#[derive(Error, Debug)]
pub enum NationError {
    #[error("snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("snapshot parse error: {0}")]
    SnapshotParse(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("unknown sector: {0}")]
    UnknownSector(u32),

    #[error("sector {0} has no progress record")]
    SectorNotTracked(u32),

    #[error("score out of range 0-100: {0}")]
    InvalidScore(u32),

    #[error("ledger parse error: {0}")]
    LedgerParse(String),

    #[error("telemetry error: {0}")]
    Telemetry(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NationError>;
