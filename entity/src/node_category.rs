use sea_orm::entity::prelude::*;
use std::fmt;

/// The level a node occupies in the product hierarchy. The values mirror the
/// CSAF branch categories the tree is exported as.
#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    strum::EnumString,
    serde::Serialize,
    serde::Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeCategory {
    #[sea_orm(string_value = "vendor")]
    Vendor,
    #[sea_orm(string_value = "product_name")]
    ProductName,
    #[sea_orm(string_value = "product_version")]
    ProductVersion,
    #[sea_orm(string_value = "product_family")]
    ProductFamily,
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
