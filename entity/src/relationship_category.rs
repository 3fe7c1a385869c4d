use sea_orm::entity::prelude::*;

// When adding a new variant, keep the string value aligned with the CSAF
// relationship category vocabulary.
#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    strum::Display,
    strum::EnumString,
    serde::Serialize,
    serde::Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RelationshipCategory {
    #[sea_orm(string_value = "default_component_of")]
    DefaultComponentOf,
    #[sea_orm(string_value = "external_component_of")]
    ExternalComponentOf,
    #[sea_orm(string_value = "installed_on")]
    InstalledOn,
    #[sea_orm(string_value = "installed_with")]
    InstalledWith,
    #[sea_orm(string_value = "optional_component_of")]
    OptionalComponentOf,
    #[sea_orm(string_value = "bundled_with")]
    BundledWith,
    #[sea_orm(string_value = "depends_on")]
    DependsOn,
    #[sea_orm(string_value = "unknown")]
    #[serde(other)]
    Unknown,
}
