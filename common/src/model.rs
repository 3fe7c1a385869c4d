use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, ToSchema)]
pub struct Paginated {
    /// The first item to return, skipping all that come before it.
    #[serde(default)]
    pub offset: u64,
    /// The maximum number of entries to return. Zero means "no limit".
    #[serde(default)]
    pub limit: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PaginatedResults<R> {
    pub items: Vec<R>,
    pub total: u64,
}
