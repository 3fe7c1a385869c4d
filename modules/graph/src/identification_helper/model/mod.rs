use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use espalier_entity::{
    identification_helper, identification_helper_category::IdentificationHelperCategory,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct IdentificationHelperHead {
    pub id: Uuid,
    pub node_id: Uuid,
    pub category: IdentificationHelperCategory,
}

impl IdentificationHelperHead {
    pub fn from_entity(helper: &identification_helper::Model) -> Self {
        IdentificationHelperHead {
            id: helper.id,
            node_id: helper.node_id,
            category: helper.category,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct IdentificationHelperDetails {
    #[serde(flatten)]
    pub head: IdentificationHelperHead,
    /// The raw metadata blob, exactly as stored.
    pub metadata: String,
}

impl IdentificationHelperDetails {
    pub fn from_entity(helper: &identification_helper::Model) -> Self {
        IdentificationHelperDetails {
            head: IdentificationHelperHead::from_entity(helper),
            metadata: helper.metadata.clone(),
        }
    }

    pub fn from_entities(helpers: &[identification_helper::Model]) -> Vec<Self> {
        helpers
            .iter()
            .map(IdentificationHelperDetails::from_entity)
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CreateIdentificationHelper {
    pub node_id: Uuid,
    pub category: IdentificationHelperCategory,
    /// Stored verbatim; only interpreted at export time.
    pub metadata: String,
}

/// Partial update. A `None` field means "leave unchanged".
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
pub struct UpdateIdentificationHelper {
    #[serde(default)]
    pub category: Option<IdentificationHelperCategory>,
    #[serde(default)]
    pub metadata: Option<String>,
}
