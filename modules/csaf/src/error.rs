use sea_orm::DbErr;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A requested product, or a node it depends on, does not exist. A missing
    /// product is a hard failure since the caller explicitly asked for it.
    #[error("product {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Database(#[from] DbErr),
}
