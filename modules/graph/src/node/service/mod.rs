use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::instrument;
use uuid::Uuid;

use espalier_common::{
    db::{Database, Transactional},
    model::{Paginated, PaginatedResults},
};
use espalier_entity::{identification_helper, node, node_category::NodeCategory, relationship};

use super::model::{
    CreateProduct, CreateProductFamily, CreateProductVersion, CreateVendor, LoadOptions,
    NodeDetails, NodeHead, NodeSummary, UpdateNode,
};
use crate::Error;

pub struct NodeService {
    db: Database,
}

impl NodeService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn create_vendor(&self, request: CreateVendor) -> Result<NodeHead, Error> {
        let tx = self.db.begin().await?;

        let node = Self::insert_node(
            NodeCategory::Vendor,
            request.name,
            request.description,
            None,
            None,
            &tx,
        )
        .await?;

        tx.commit().await?;
        Ok(NodeHead::from_entity(&node))
    }

    #[instrument(skip(self), err)]
    pub async fn create_product(&self, request: CreateProduct) -> Result<NodeHead, Error> {
        let tx = self.db.begin().await?;

        Self::require_parent(request.vendor_id, NodeCategory::Vendor, NodeCategory::ProductName, &tx)
            .await?;
        let node = Self::insert_node(
            NodeCategory::ProductName,
            request.name,
            request.description,
            Some(request.vendor_id),
            None,
            &tx,
        )
        .await?;

        tx.commit().await?;
        Ok(NodeHead::from_entity(&node))
    }

    #[instrument(skip(self), err)]
    pub async fn create_version(&self, request: CreateProductVersion) -> Result<NodeHead, Error> {
        let tx = self.db.begin().await?;

        Self::require_parent(
            request.product_id,
            NodeCategory::ProductName,
            NodeCategory::ProductVersion,
            &tx,
        )
        .await?;

        if let Some(predecessor) = request.predecessor_id {
            Self::require_version_of(predecessor, request.product_id, &tx).await?;
        }

        let node = Self::insert_node(
            NodeCategory::ProductVersion,
            request.name,
            request.description,
            Some(request.product_id),
            request.predecessor_id,
            &tx,
        )
        .await?;

        tx.commit().await?;
        Ok(NodeHead::from_entity(&node))
    }

    #[instrument(skip(self), err)]
    pub async fn create_family(&self, request: CreateProductFamily) -> Result<NodeHead, Error> {
        let tx = self.db.begin().await?;

        if let Some(parent) = request.parent_id {
            Self::require_parent(
                parent,
                NodeCategory::ProductFamily,
                NodeCategory::ProductFamily,
                &tx,
            )
            .await?;
        }

        let node = Self::insert_node(
            NodeCategory::ProductFamily,
            request.name,
            request.description,
            request.parent_id,
            None,
            &tx,
        )
        .await?;

        tx.commit().await?;
        Ok(NodeHead::from_entity(&node))
    }

    #[instrument(skip(self, tx), err)]
    pub async fn fetch_node<TX: AsRef<Transactional> + Sync + Send>(
        &self,
        id: Uuid,
        tx: TX,
    ) -> Result<Option<NodeDetails>, Error> {
        let connection = self.db.connection(&tx);

        match node::Entity::find_by_id(id).one(&connection).await? {
            Some(node) => Ok(Some(NodeDetails::from_entity(&node, &connection).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    pub async fn update_node(&self, id: Uuid, request: UpdateNode) -> Result<NodeHead, Error> {
        let tx = self.db.begin().await?;

        let node = node::Entity::find_by_id(id)
            .one(&tx)
            .await?
            .ok_or(Error::NotFound(id))?;

        let mut parent_id = node.parent_id;
        let mut predecessor_id = node.predecessor_id;

        if let Some(parent) = request.parent_id {
            match node.category {
                NodeCategory::Vendor => {
                    return Err(Error::InvalidParent {
                        parent,
                        category: NodeCategory::Vendor,
                    })
                }
                NodeCategory::ProductName => {
                    Self::require_parent(parent, NodeCategory::Vendor, node.category, &tx).await?;
                }
                NodeCategory::ProductVersion => {
                    Self::require_parent(parent, NodeCategory::ProductName, node.category, &tx)
                        .await?;
                    // a predecessor chain must not cross products; moving the
                    // version clears a link the move would invalidate
                    if request.predecessor_id.is_none() {
                        if let Some(predecessor) = predecessor_id {
                            let keep = node::Entity::find_by_id(predecessor)
                                .one(&tx)
                                .await?
                                .map(|p| p.parent_id == Some(parent))
                                .unwrap_or(false);
                            if !keep {
                                predecessor_id = None;
                            }
                        }
                    }
                }
                NodeCategory::ProductFamily => {
                    Self::require_parent(parent, NodeCategory::ProductFamily, node.category, &tx)
                        .await?;
                    Self::ensure_no_ancestor_cycle(id, parent, &tx).await?;
                }
            }
            parent_id = Some(parent);
        }

        if let Some(predecessor) = request.predecessor_id {
            if node.category != NodeCategory::ProductVersion {
                return Err(Error::InvalidNode(predecessor));
            }
            let product = parent_id.ok_or(Error::InvalidNode(predecessor))?;
            Self::require_version_of(predecessor, product, &tx).await?;
            Self::ensure_no_predecessor_cycle(id, predecessor, &tx).await?;
            predecessor_id = Some(predecessor);
        }

        let mut active: node::ActiveModel = node.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        active.parent_id = Set(parent_id);
        active.predecessor_id = Set(predecessor_id);

        let node = active.update(&tx).await?;

        tx.commit().await?;
        Ok(NodeHead::from_entity(&node))
    }

    /// Deletes a node, refusing while any child node, relationship edge or
    /// identification helper still references it. Callers delete dependents
    /// first: versions before products, helpers and edges before versions.
    #[instrument(skip(self), err)]
    pub async fn delete_node(&self, id: Uuid) -> Result<(), Error> {
        let tx = self.db.begin().await?;

        let node = node::Entity::find_by_id(id)
            .one(&tx)
            .await?
            .ok_or(Error::NotFound(id))?;

        let children = node::Entity::find()
            .filter(node::Column::ParentId.eq(id))
            .count(&tx)
            .await?;
        let edges = relationship::Entity::find()
            .filter(
                Condition::any()
                    .add(relationship::Column::SourceNodeId.eq(id))
                    .add(relationship::Column::TargetNodeId.eq(id)),
            )
            .count(&tx)
            .await?;
        let helpers = identification_helper::Entity::find()
            .filter(identification_helper::Column::NodeId.eq(id))
            .count(&tx)
            .await?;

        if children + edges + helpers > 0 {
            return Err(Error::HasDependents(id));
        }

        node.delete(&tx).await?;

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self, tx), err)]
    pub async fn list_nodes_by_category<TX: AsRef<Transactional> + Sync + Send>(
        &self,
        category: NodeCategory,
        options: LoadOptions,
        paginated: Paginated,
        tx: TX,
    ) -> Result<PaginatedResults<NodeSummary>, Error> {
        let connection = self.db.connection(&tx);

        let select = node::Entity::find()
            .filter(node::Column::Category.eq(category))
            .order_by_asc(node::Column::CreatedAt);

        let total = select.clone().count(&connection).await?;

        let mut select = select.offset(paginated.offset);
        if paginated.limit > 0 {
            select = select.limit(paginated.limit);
        }

        let mut items = Vec::new();
        for node in select.all(&connection).await? {
            items.push(NodeSummary::from_entity(&node, options, &connection).await?);
        }

        Ok(PaginatedResults { items, total })
    }

    async fn insert_node<C: ConnectionTrait>(
        category: NodeCategory,
        name: String,
        description: Option<String>,
        parent_id: Option<Uuid>,
        predecessor_id: Option<Uuid>,
        connection: &C,
    ) -> Result<node::Model, Error> {
        let model = node::ActiveModel {
            id: Set(Uuid::new_v4()),
            category: Set(category),
            name: Set(name),
            description: Set(description),
            parent_id: Set(parent_id),
            predecessor_id: Set(predecessor_id),
            created_at: Set(Utc::now()),
        };

        Ok(model.insert(connection).await?)
    }

    async fn require_parent<C: ConnectionTrait>(
        parent: Uuid,
        expected: NodeCategory,
        category: NodeCategory,
        connection: &C,
    ) -> Result<node::Model, Error> {
        match node::Entity::find_by_id(parent).one(connection).await? {
            Some(node) if node.category == expected => Ok(node),
            _ => Err(Error::InvalidParent { parent, category }),
        }
    }

    async fn require_version_of<C: ConnectionTrait>(
        id: Uuid,
        product: Uuid,
        connection: &C,
    ) -> Result<node::Model, Error> {
        match node::Entity::find_by_id(id).one(connection).await? {
            Some(node)
                if node.category == NodeCategory::ProductVersion
                    && node.parent_id == Some(product) =>
            {
                Ok(node)
            }
            _ => Err(Error::InvalidNode(id)),
        }
    }

    async fn ensure_no_predecessor_cycle<C: ConnectionTrait>(
        id: Uuid,
        predecessor: Uuid,
        connection: &C,
    ) -> Result<(), Error> {
        let mut visited = HashSet::new();
        let mut current = Some(predecessor);

        while let Some(step) = current {
            if step == id {
                return Err(Error::Cycle(id));
            }
            if !visited.insert(step) {
                break;
            }
            current = node::Entity::find_by_id(step)
                .one(connection)
                .await?
                .and_then(|node| node.predecessor_id);
        }

        Ok(())
    }

    async fn ensure_no_ancestor_cycle<C: ConnectionTrait>(
        id: Uuid,
        parent: Uuid,
        connection: &C,
    ) -> Result<(), Error> {
        let mut visited = HashSet::new();
        let mut current = Some(parent);

        while let Some(step) = current {
            if step == id {
                return Err(Error::Cycle(id));
            }
            if !visited.insert(step) {
                break;
            }
            current = node::Entity::find_by_id(step)
                .one(connection)
                .await?
                .and_then(|node| node.parent_id);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test;
