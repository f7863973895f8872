use crate::scene::SceneError;
use crate::state::StateError;
use crate::storage::StorageError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("GTK application exited with status {0}")]
    Gtk(i32),
}
