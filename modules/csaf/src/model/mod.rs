use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use espalier_entity::{
    identification_helper, identification_helper_category::IdentificationHelperCategory,
    node_category::NodeCategory, relationship_category::RelationshipCategory,
};

/// The exported product-tree document: nested vendor/product/version branches
/// plus a flat relationships section.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
pub struct Document {
    pub product_tree: ProductTree,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
pub struct ProductTree {
    #[serde(default)]
    pub branches: Vec<Branch>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BranchCategory {
    Vendor,
    ProductName,
    ProductVersion,
    ProductFamily,
}

impl From<NodeCategory> for BranchCategory {
    fn from(category: NodeCategory) -> Self {
        match category {
            NodeCategory::Vendor => BranchCategory::Vendor,
            NodeCategory::ProductName => BranchCategory::ProductName,
            NodeCategory::ProductVersion => BranchCategory::ProductVersion,
            NodeCategory::ProductFamily => BranchCategory::ProductFamily,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Branch {
    pub category: BranchCategory,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<Branch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<FullProductName>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct FullProductName {
    pub product_id: String,
    /// Synthesized as `"{product name} {version name}"`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_identification_helper: Option<ProductIdentificationHelper>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Relationship {
    pub category: RelationshipCategory,
    pub product_reference: FullProductName,
    pub relates_to_product_reference: FullProductName,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
pub struct ProductIdentificationHelper {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashes: Option<Vec<HashCollection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_numbers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sbom_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skus: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_generic_uris: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_numbers: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct HashCollection {
    pub filename: String,
    pub file_hashes: Vec<FileHash>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct FileHash {
    pub algorithm: String,
    pub value: String,
}

// The shapes helper metadata blobs are expected to parse into, per category.
// Everything is optional: a recognized category missing its field simply
// produces no identifier.

#[derive(Deserialize)]
struct CpeMetadata {
    cpe: Option<String>,
}

#[derive(Deserialize)]
struct PurlMetadata {
    purl: Option<String>,
}

#[derive(Deserialize)]
struct SwidMetadata {
    swid: Option<String>,
}

#[derive(Deserialize)]
struct HashesMetadata {
    file_hashes: Option<Vec<FileHashesEntry>>,
}

#[derive(Deserialize)]
struct FileHashesEntry {
    filename: Option<String>,
    items: Option<Vec<HashItem>>,
}

#[derive(Deserialize)]
struct HashItem {
    algorithm: String,
    value: String,
}

#[derive(Deserialize)]
struct ModelsMetadata {
    models: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct SbomMetadata {
    sbom_urls: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct SkuMetadata {
    skus: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct UriMetadata {
    uris: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct SerialMetadata {
    serial_numbers: Option<Vec<String>>,
}

impl ProductIdentificationHelper {
    /// Converts a version's stored helpers into the CSAF identification
    /// shape. Failures are strictly per-helper: malformed JSON or a missing
    /// expected field yields no identifier for that one helper and never
    /// aborts the export.
    pub fn from_helpers(helpers: &[identification_helper::Model]) -> Option<Self> {
        let mut result = Self::default();

        for helper in helpers {
            result.apply(helper);
        }

        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&mut self, helper: &identification_helper::Model) {
        match helper.category {
            IdentificationHelperCategory::Cpe => {
                if let Some(CpeMetadata { cpe: Some(cpe) }) = parse(helper) {
                    self.cpe = Some(cpe);
                }
            }
            IdentificationHelperCategory::Purl => {
                if let Some(PurlMetadata { purl: Some(purl) }) = parse(helper) {
                    self.purl = Some(purl);
                }
            }
            IdentificationHelperCategory::Swid => {
                if let Some(SwidMetadata { swid: Some(swid) }) = parse(helper) {
                    self.swid = Some(swid);
                }
            }
            IdentificationHelperCategory::Hashes => {
                if let Some(HashesMetadata {
                    file_hashes: Some(entries),
                }) = parse(helper)
                {
                    // entries missing filename or items are skipped, not fatal
                    let collections: Vec<HashCollection> = entries
                        .into_iter()
                        .filter_map(|entry| match (entry.filename, entry.items) {
                            (Some(filename), Some(items)) => Some(HashCollection {
                                filename,
                                file_hashes: items
                                    .into_iter()
                                    .map(|item| FileHash {
                                        algorithm: item.algorithm,
                                        value: item.value,
                                    })
                                    .collect(),
                            }),
                            _ => None,
                        })
                        .collect();
                    if !collections.is_empty() {
                        self.hashes.get_or_insert_with(Vec::new).extend(collections);
                    }
                }
            }
            IdentificationHelperCategory::Models => {
                if let Some(ModelsMetadata { models }) = parse(helper) {
                    extend(&mut self.model_numbers, models);
                }
            }
            IdentificationHelperCategory::Sbom => {
                if let Some(SbomMetadata { sbom_urls }) = parse(helper) {
                    extend(&mut self.sbom_urls, sbom_urls);
                }
            }
            IdentificationHelperCategory::Sku => {
                if let Some(SkuMetadata { skus }) = parse(helper) {
                    extend(&mut self.skus, skus);
                }
            }
            IdentificationHelperCategory::Uri => {
                if let Some(UriMetadata { uris }) = parse(helper) {
                    extend(&mut self.x_generic_uris, uris);
                }
            }
            IdentificationHelperCategory::Serial => {
                if let Some(SerialMetadata { serial_numbers }) = parse(helper) {
                    extend(&mut self.serial_numbers, serial_numbers);
                }
            }
            IdentificationHelperCategory::Unknown => {}
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(helper: &identification_helper::Model) -> Option<T> {
    match serde_json::from_str(&helper.metadata) {
        Ok(value) => Some(value),
        Err(err) => {
            log::debug!(
                "skipping malformed metadata of identification helper {}: {err}",
                helper.id
            );
            None
        }
    }
}

fn extend(target: &mut Option<Vec<String>>, values: Option<Vec<String>>) {
    match values {
        Some(values) if !values.is_empty() => {
            target.get_or_insert_with(Vec::new).extend(values);
        }
        _ => {}
    }
}
