use sea_orm::entity::prelude::*;

use crate::{identification_helper_category::IdentificationHelperCategory, node};

/// A category-tagged metadata blob attached to a `product_version` node.
///
/// The metadata is stored verbatim as text. It is only parsed as JSON when a
/// CSAF export converts it into an identifier, so storing a malformed blob is
/// allowed and degrades to "no identifier produced".
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "identification_helper")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub node_id: Uuid,
    pub category: IdentificationHelperCategory,
    #[sea_orm(column_type = "Text")]
    pub metadata: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::node::Entity",
        from = "Column::NodeId",
        to = "super::node::Column::Id"
    )]
    Node,
}

impl Related<node::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Node.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
