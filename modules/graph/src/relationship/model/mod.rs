use sea_orm::{ConnectionTrait, EntityTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use espalier_entity::{node, relationship, relationship_category::RelationshipCategory};

use crate::{node::model::NodeHead, Error};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct RelationshipHead {
    pub id: Uuid,
    pub category: RelationshipCategory,
    pub source_node_id: Uuid,
    pub target_node_id: Uuid,
}

impl RelationshipHead {
    pub fn from_entity(relationship: &relationship::Model) -> Self {
        RelationshipHead {
            id: relationship.id,
            category: relationship.category,
            source_node_id: relationship.source_node_id,
            target_node_id: relationship.target_node_id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct RelationshipDetails {
    #[serde(flatten)]
    pub head: RelationshipHead,
    pub source: NodeHead,
    pub target: NodeHead,
}

impl RelationshipDetails {
    pub async fn from_entity<C: ConnectionTrait>(
        relationship: &relationship::Model,
        connection: &C,
    ) -> Result<Self, Error> {
        let source = node::Entity::find_by_id(relationship.source_node_id)
            .one(connection)
            .await?
            .ok_or(Error::NotFound(relationship.source_node_id))?;
        let target = node::Entity::find_by_id(relationship.target_node_id)
            .one(connection)
            .await?
            .ok_or(Error::NotFound(relationship.target_node_id))?;

        Ok(RelationshipDetails {
            head: RelationshipHead::from_entity(relationship),
            source: NodeHead::from_entity(&source),
            target: NodeHead::from_entity(&target),
        })
    }

    pub async fn from_entities<C: ConnectionTrait>(
        relationships: &[relationship::Model],
        connection: &C,
    ) -> Result<Vec<Self>, Error> {
        let mut details = Vec::new();

        for entity in relationships {
            details.push(RelationshipDetails::from_entity(entity, connection).await?);
        }

        Ok(details)
    }
}

/// Expands into one edge per (source, target) pair, all sharing one category.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CreateRelationship {
    pub category: RelationshipCategory,
    pub source_node_ids: Vec<Uuid>,
    pub target_node_ids: Vec<Uuid>,
}

/// Replaces all edges matching `(source_node_id, previous_category)` with
/// fresh `(source_node_id, category, target)` edges.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct UpdateRelationship {
    pub source_node_id: Uuid,
    pub previous_category: RelationshipCategory,
    pub category: RelationshipCategory,
    pub target_node_ids: Vec<Uuid>,
}
