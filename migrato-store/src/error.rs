#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("location `{0}` is not readable: {1}")]
    UnreadableLocation(String, std::io::Error),

    #[error("migration `{0}` has no apply time")]
    MissingApplyTime(String),

    #[error("apply time `{1}` of migration `{0}` is out of range")]
    InvalidApplyTime(String, i64),

    #[cfg(any(feature = "sqlite", feature = "postgres"))]
    #[error("sqlx `{0}`")]
    Sqlx(#[from] sqlx::Error),

    #[error("{0}")]
    Any(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
