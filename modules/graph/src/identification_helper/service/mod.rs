use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::instrument;
use uuid::Uuid;

use espalier_common::db::{Database, Transactional};
use espalier_entity::{identification_helper, node, node_category::NodeCategory};

use super::model::{
    CreateIdentificationHelper, IdentificationHelperDetails, UpdateIdentificationHelper,
};
use crate::Error;

pub struct IdentificationHelperService {
    db: Database,
}

impl IdentificationHelperService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn create_helper(
        &self,
        request: CreateIdentificationHelper,
    ) -> Result<IdentificationHelperDetails, Error> {
        let tx = self.db.begin().await?;

        let node = node::Entity::find_by_id(request.node_id).one(&tx).await?;
        if !node
            .map(|node| node.category == NodeCategory::ProductVersion)
            .unwrap_or(false)
        {
            return Err(Error::InvalidNode(request.node_id));
        }

        let model = identification_helper::ActiveModel {
            id: Set(Uuid::new_v4()),
            node_id: Set(request.node_id),
            category: Set(request.category),
            metadata: Set(request.metadata),
        };
        let helper = model.insert(&tx).await?;

        tx.commit().await?;
        Ok(IdentificationHelperDetails::from_entity(&helper))
    }

    #[instrument(skip(self, tx), err)]
    pub async fn fetch_helper<TX: AsRef<Transactional> + Sync + Send>(
        &self,
        id: Uuid,
        tx: TX,
    ) -> Result<Option<IdentificationHelperDetails>, Error> {
        let connection = self.db.connection(&tx);

        Ok(identification_helper::Entity::find_by_id(id)
            .one(&connection)
            .await?
            .as_ref()
            .map(IdentificationHelperDetails::from_entity))
    }

    #[instrument(skip(self, tx), err)]
    pub async fn fetch_helpers_for_node<TX: AsRef<Transactional> + Sync + Send>(
        &self,
        node_id: Uuid,
        tx: TX,
    ) -> Result<Vec<IdentificationHelperDetails>, Error> {
        let connection = self.db.connection(&tx);

        let helpers = identification_helper::Entity::find()
            .filter(identification_helper::Column::NodeId.eq(node_id))
            .all(&connection)
            .await?;

        Ok(IdentificationHelperDetails::from_entities(&helpers))
    }

    #[instrument(skip(self), err)]
    pub async fn update_helper(
        &self,
        id: Uuid,
        request: UpdateIdentificationHelper,
    ) -> Result<IdentificationHelperDetails, Error> {
        let tx = self.db.begin().await?;

        let helper = identification_helper::Entity::find_by_id(id)
            .one(&tx)
            .await?
            .ok_or(Error::NotFound(id))?;

        let mut active: identification_helper::ActiveModel = helper.into();
        if let Some(category) = request.category {
            active.category = Set(category);
        }
        if let Some(metadata) = request.metadata {
            active.metadata = Set(metadata);
        }
        let helper = active.update(&tx).await?;

        tx.commit().await?;
        Ok(IdentificationHelperDetails::from_entity(&helper))
    }

    /// Strict delete: a non-existent id is an error, unlike the idempotent
    /// relationship cleanup by (source, category).
    #[instrument(skip(self), err)]
    pub async fn delete_helper(&self, id: Uuid) -> Result<(), Error> {
        let result = identification_helper::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(Error::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test;
