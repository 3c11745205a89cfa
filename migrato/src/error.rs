#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("panel task is no longer running")]
    Closed,
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for PanelError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        PanelError::Closed
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for PanelError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        PanelError::Closed
    }
}

pub type Result<T> = std::result::Result<T, PanelError>;
