use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::instrument;
use uuid::Uuid;

use espalier_common::db::{Database, Transactional};
use espalier_entity::{
    node, node_category::NodeCategory, relationship,
    relationship_category::RelationshipCategory,
};

use super::model::{CreateRelationship, RelationshipDetails, RelationshipHead, UpdateRelationship};
use crate::Error;

pub struct RelationshipService {
    db: Database,
}

impl RelationshipService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Creates the N×M edge expansion of the request. Validation is
    /// all-or-nothing: if any source or target does not resolve to an existing
    /// `product_version`, no edge is created at all.
    #[instrument(skip(self), err)]
    pub async fn create_relationship(
        &self,
        request: CreateRelationship,
    ) -> Result<Vec<RelationshipHead>, Error> {
        let tx = self.db.begin().await?;

        Self::require_versions(
            request
                .source_node_ids
                .iter()
                .chain(request.target_node_ids.iter()),
            &tx,
        )
        .await?;

        let edges = Self::insert_edges(
            request.category,
            &request.source_node_ids,
            &request.target_node_ids,
            &tx,
        )
        .await?;

        tx.commit().await?;
        Ok(edges)
    }

    #[instrument(skip(self, tx), err)]
    pub async fn fetch_relationship<TX: AsRef<Transactional> + Sync + Send>(
        &self,
        id: Uuid,
        tx: TX,
    ) -> Result<Option<RelationshipDetails>, Error> {
        let connection = self.db.connection(&tx);

        match relationship::Entity::find_by_id(id).one(&connection).await? {
            Some(relationship) => Ok(Some(
                RelationshipDetails::from_entity(&relationship, &connection).await?,
            )),
            None => Ok(None),
        }
    }

    /// Returns the edges leaving `source_node_id` under `category`; an empty
    /// collection when nothing matches.
    #[instrument(skip(self, tx), err)]
    pub async fn fetch_by_source_and_category<TX: AsRef<Transactional> + Sync + Send>(
        &self,
        source_node_id: Uuid,
        category: RelationshipCategory,
        tx: TX,
    ) -> Result<Vec<RelationshipDetails>, Error> {
        let connection = self.db.connection(&tx);

        let relationships = relationship::Entity::find()
            .filter(relationship::Column::SourceNodeId.eq(source_node_id))
            .filter(relationship::Column::Category.eq(category))
            .all(&connection)
            .await?;

        RelationshipDetails::from_entities(&relationships, &connection).await
    }

    /// Replace, not patch: drops every `(source, previous_category)` edge,
    /// then creates the new target set. Zero previous matches is still
    /// success.
    #[instrument(skip(self), err)]
    pub async fn update_relationship(
        &self,
        request: UpdateRelationship,
    ) -> Result<Vec<RelationshipHead>, Error> {
        let tx = self.db.begin().await?;

        Self::require_versions(
            std::iter::once(&request.source_node_id).chain(request.target_node_ids.iter()),
            &tx,
        )
        .await?;

        relationship::Entity::delete_many()
            .filter(relationship::Column::SourceNodeId.eq(request.source_node_id))
            .filter(relationship::Column::Category.eq(request.previous_category))
            .exec(&tx)
            .await?;

        let edges = Self::insert_edges(
            request.category,
            &[request.source_node_id],
            &request.target_node_ids,
            &tx,
        )
        .await?;

        tx.commit().await?;
        Ok(edges)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_relationship(&self, id: Uuid) -> Result<(), Error> {
        let result = relationship::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(Error::NotFound(id));
        }

        Ok(())
    }

    /// Idempotent category cleanup: deleting a `(source, category)` pair with
    /// no matching edges succeeds with zero effect.
    #[instrument(skip(self), err)]
    pub async fn delete_by_source_and_category(
        &self,
        source_node_id: Uuid,
        category: RelationshipCategory,
    ) -> Result<u64, Error> {
        let result = relationship::Entity::delete_many()
            .filter(relationship::Column::SourceNodeId.eq(source_node_id))
            .filter(relationship::Column::Category.eq(category))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Fails with `InvalidNode` naming the first id that is not an existing
    /// `product_version`.
    async fn require_versions<'a, C: ConnectionTrait>(
        ids: impl Iterator<Item = &'a Uuid>,
        connection: &C,
    ) -> Result<(), Error> {
        let mut checked: HashMap<Uuid, bool> = HashMap::new();

        for id in ids {
            let valid = match checked.get(id) {
                Some(valid) => *valid,
                None => {
                    let valid = node::Entity::find_by_id(*id)
                        .one(connection)
                        .await?
                        .map(|node| node.category == NodeCategory::ProductVersion)
                        .unwrap_or(false);
                    checked.insert(*id, valid);
                    valid
                }
            };

            if !valid {
                return Err(Error::InvalidNode(*id));
            }
        }

        Ok(())
    }

    async fn insert_edges<C: ConnectionTrait>(
        category: RelationshipCategory,
        sources: &[Uuid],
        targets: &[Uuid],
        connection: &C,
    ) -> Result<Vec<RelationshipHead>, Error> {
        let mut created = Vec::with_capacity(sources.len() * targets.len());
        for source in sources {
            for target in targets {
                created.push(relationship::Model {
                    id: Uuid::new_v4(),
                    category,
                    source_node_id: *source,
                    target_node_id: *target,
                });
            }
        }

        if !created.is_empty() {
            relationship::Entity::insert_many(created.iter().map(|model| {
                relationship::ActiveModel {
                    id: Set(model.id),
                    category: Set(model.category),
                    source_node_id: Set(model.source_node_id),
                    target_node_id: Set(model.target_node_id),
                }
            }))
            .exec(connection)
            .await?;
        }

        Ok(created.iter().map(RelationshipHead::from_entity).collect())
    }
}
