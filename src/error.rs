use sea_orm::DbErr;
use thiserror::Error;

use crate::platform::PlatformError;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("database error: {0}")]
    Db(#[from] DbErr),
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}
