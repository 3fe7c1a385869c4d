use espalier_entity::node_category::NodeCategory;
use sea_orm::DbErr;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node {0} not found")]
    NotFound(Uuid),

    #[error("invalid parent {parent} for {category} node")]
    InvalidParent { parent: Uuid, category: NodeCategory },

    #[error("invalid node reference {0}")]
    InvalidNode(Uuid),

    #[error("node {0} still has dependents")]
    HasDependents(Uuid),

    #[error("cycle detected at node {0}")]
    Cycle(Uuid),

    #[error(transparent)]
    Database(#[from] DbErr),
}
