use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use espalier_entity::{identification_helper, node, node_category::NodeCategory, relationship};

use crate::{
    identification_helper::model::IdentificationHelperHead,
    relationship::model::RelationshipHead, Error,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct NodeHead {
    pub id: Uuid,
    pub category: NodeCategory,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NodeHead {
    pub fn from_entity(node: &node::Model) -> Self {
        NodeHead {
            id: node.id,
            category: node.category,
            name: node.name.clone(),
            description: node.description.clone(),
        }
    }

    pub fn from_entities(nodes: &[node::Model]) -> Vec<Self> {
        nodes.iter().map(NodeHead::from_entity).collect()
    }
}

/// Flags controlling which neighboring records `list_nodes_by_category` loads
/// alongside each node. Shape-only toggles, freely combinable.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, ToSchema)]
pub struct LoadOptions {
    #[serde(default)]
    pub include_children: bool,
    #[serde(default)]
    pub include_relationships: bool,
    #[serde(default)]
    pub include_parent: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct NodeSummary {
    #[serde(flatten)]
    pub head: NodeHead,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeHead>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeHead>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<RelationshipHead>,
}

impl NodeSummary {
    pub async fn from_entity<C: ConnectionTrait>(
        node: &node::Model,
        options: LoadOptions,
        connection: &C,
    ) -> Result<Self, Error> {
        let parent = match (options.include_parent, node.parent_id) {
            (true, Some(parent_id)) => node::Entity::find_by_id(parent_id)
                .one(connection)
                .await?
                .map(|parent| NodeHead::from_entity(&parent)),
            _ => None,
        };

        let children = if options.include_children {
            let children = node::Entity::find()
                .filter(node::Column::ParentId.eq(node.id))
                .order_by_asc(node::Column::CreatedAt)
                .all(connection)
                .await?;
            NodeHead::from_entities(&children)
        } else {
            Vec::new()
        };

        let relationships = if options.include_relationships {
            relationship::Entity::find()
                .filter(relationship::Column::SourceNodeId.eq(node.id))
                .all(connection)
                .await?
                .iter()
                .map(RelationshipHead::from_entity)
                .collect()
        } else {
            Vec::new()
        };

        Ok(NodeSummary {
            head: NodeHead::from_entity(node),
            parent,
            children,
            relationships,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct NodeDetails {
    #[serde(flatten)]
    pub head: NodeHead,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeHead>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predecessor_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeHead>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identification_helpers: Vec<IdentificationHelperHead>,
}

impl NodeDetails {
    pub async fn from_entity<C: ConnectionTrait>(
        node: &node::Model,
        connection: &C,
    ) -> Result<Self, Error> {
        let parent = match node.parent_id {
            Some(parent_id) => node::Entity::find_by_id(parent_id)
                .one(connection)
                .await?
                .map(|parent| NodeHead::from_entity(&parent)),
            None => None,
        };

        let children = node::Entity::find()
            .filter(node::Column::ParentId.eq(node.id))
            .order_by_asc(node::Column::CreatedAt)
            .all(connection)
            .await?;

        let identification_helpers = node
            .find_related(identification_helper::Entity)
            .all(connection)
            .await?
            .iter()
            .map(IdentificationHelperHead::from_entity)
            .collect();

        Ok(NodeDetails {
            head: NodeHead::from_entity(node),
            parent,
            predecessor_id: node.predecessor_id,
            children: NodeHead::from_entities(&children),
            identification_helpers,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CreateVendor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CreateProduct {
    pub vendor_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CreateProductVersion {
    pub product_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// The version this one succeeds within the same product.
    #[serde(default)]
    pub predecessor_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CreateProductFamily {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Optional parent family.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// Partial update. A `None` field means "leave unchanged".
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
pub struct UpdateNode {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub predecessor_id: Option<Uuid>,
}
