use sea_orm::entity::prelude::*;

use crate::{identification_helper, node_category::NodeCategory};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "node")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category: NodeCategory,
    pub name: String,
    pub description: Option<String>,
    /// The next level up in the hierarchy, `None` for vendors and root
    /// families.
    pub parent_id: Option<Uuid>,
    /// Link to the preceding version of the same product, forming the
    /// per-product ordering chain. Only set on `product_version` nodes.
    pub predecessor_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(belongs_to = "Entity", from = "Column::ParentId", to = "Column::Id")]
    Parent,
    #[sea_orm(has_many = "super::identification_helper::Entity")]
    IdentificationHelper,
}

impl Related<identification_helper::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IdentificationHelper.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
