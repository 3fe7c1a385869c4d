use sea_orm::entity::prelude::*;

/// Determines which CSAF identification shape a helper's metadata blob is
/// converted into at export time. `Unknown` helpers are stored but never
/// produce an identifier.
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
pub enum IdentificationHelperCategory {
    #[sea_orm(string_value = "cpe")]
    Cpe,
    #[sea_orm(string_value = "purl")]
    Purl,
    #[sea_orm(string_value = "swid")]
    Swid,
    #[sea_orm(string_value = "hashes")]
    Hashes,
    #[sea_orm(string_value = "models")]
    Models,
    #[sea_orm(string_value = "sbom")]
    Sbom,
    #[sea_orm(string_value = "sku")]
    Sku,
    #[sea_orm(string_value = "uri")]
    Uri,
    #[sea_orm(string_value = "serial")]
    Serial,
    #[sea_orm(string_value = "unknown")]
    #[serde(other)]
    Unknown,
}
