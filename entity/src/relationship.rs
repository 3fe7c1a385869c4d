use sea_orm::entity::prelude::*;

use crate::relationship_category::RelationshipCategory;

/// A typed directed edge between two `product_version` nodes. Self-edges are
/// permitted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "relationship")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category: RelationshipCategory,
    pub source_node_id: Uuid,
    pub target_node_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::node::Entity",
        from = "Column::SourceNodeId",
        to = "super::node::Column::Id"
    )]
    SourceNode,
    #[sea_orm(
        belongs_to = "super::node::Entity",
        from = "Column::TargetNodeId",
        to = "super::node::Column::Id"
    )]
    TargetNode,
}

impl ActiveModelBehavior for ActiveModel {}
