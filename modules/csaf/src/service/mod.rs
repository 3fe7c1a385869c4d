use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::instrument;
use uuid::Uuid;

use espalier_common::db::{Database, Transactional};
use espalier_entity::{identification_helper, node, node_category::NodeCategory, relationship};
use espalier_module_graph::node::order::order_versions;

use crate::model::{
    Branch, BranchCategory, Document, FullProductName, ProductIdentificationHelper, Relationship,
};
use crate::Error;

pub struct ExportService {
    db: Database,
}

impl ExportService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Assembles the CSAF product tree for the requested products: one branch
    /// per vendor, one sub-branch per product, one leaf per version, plus a
    /// flat relationships section for every edge leaving an included version.
    ///
    /// Read-only. Every requested id must resolve to an existing product or
    /// the whole export fails with `NotFound`; an empty request yields an
    /// empty document.
    #[instrument(skip(self, tx), err)]
    pub async fn export_product_tree<TX: AsRef<Transactional> + Sync + Send>(
        &self,
        product_ids: &[Uuid],
        tx: TX,
    ) -> Result<Document, Error> {
        let connection = self.db.connection(&tx);

        let mut document = Document::default();
        if product_ids.is_empty() {
            return Ok(document);
        }

        // resolve every product up front; a single unresolvable id fails the
        // whole export
        let mut products: Vec<node::Model> = Vec::new();
        for id in product_ids {
            if products.iter().any(|product| product.id == *id) {
                continue;
            }
            let product = node::Entity::find_by_id(*id)
                .one(&connection)
                .await?
                .filter(|node| node.category == NodeCategory::ProductName)
                .ok_or(Error::NotFound(*id))?;
            products.push(product);
        }

        // group by vendor, keeping first-seen order
        let mut vendors: Vec<(node::Model, Vec<node::Model>)> = Vec::new();
        for product in products {
            let vendor_id = product.parent_id.ok_or(Error::NotFound(product.id))?;
            match vendors.iter_mut().find(|(vendor, _)| vendor.id == vendor_id) {
                Some((_, group)) => group.push(product),
                None => {
                    let vendor = node::Entity::find_by_id(vendor_id)
                        .one(&connection)
                        .await?
                        .ok_or(Error::NotFound(vendor_id))?;
                    vendors.push((vendor, vec![product]));
                }
            }
        }

        // (category, target product name, target version name) sort keys
        let mut relationships: Vec<(String, String, String, Relationship)> = Vec::new();

        for (vendor, products) in &vendors {
            let mut vendor_branch = Branch {
                category: BranchCategory::Vendor,
                name: vendor.name.clone(),
                branches: Vec::new(),
                product: None,
            };

            for product in products {
                let versions = node::Entity::find()
                    .filter(node::Column::ParentId.eq(product.id))
                    .filter(node::Column::Category.eq(NodeCategory::ProductVersion))
                    .order_by_asc(node::Column::CreatedAt)
                    .all(&connection)
                    .await?;
                let versions = order_versions(versions);

                let mut product_branch = Branch {
                    category: BranchCategory::ProductName,
                    name: product.name.clone(),
                    branches: Vec::new(),
                    product: None,
                };

                for version in &versions {
                    let helpers = identification_helper::Entity::find()
                        .filter(identification_helper::Column::NodeId.eq(version.id))
                        .all(&connection)
                        .await?;

                    let source = FullProductName {
                        product_id: version.id.to_string(),
                        name: format!("{} {}", product.name, version.name),
                        product_identification_helper: None,
                    };

                    product_branch.branches.push(Branch {
                        category: BranchCategory::ProductVersion,
                        name: version.name.clone(),
                        branches: Vec::new(),
                        product: Some(FullProductName {
                            product_identification_helper:
                                ProductIdentificationHelper::from_helpers(&helpers),
                            ..source.clone()
                        }),
                    });

                    let edges = relationship::Entity::find()
                        .filter(relationship::Column::SourceNodeId.eq(version.id))
                        .all(&connection)
                        .await?;
                    for edge in edges {
                        if let Some(entry) =
                            Self::relationship_entry(&edge, &source, &connection).await?
                        {
                            relationships.push(entry);
                        }
                    }
                }

                vendor_branch.branches.push(product_branch);
            }

            document.product_tree.branches.push(vendor_branch);
        }

        // group by category, then target product, then target version
        relationships.sort_by(|a, b| (&a.0, &a.1, &a.2).cmp(&(&b.0, &b.1, &b.2)));
        document.relationships = relationships
            .into_iter()
            .map(|(_, _, _, entry)| entry)
            .collect();

        Ok(document)
    }

    /// Resolves an edge's target into a relationship entry. An edge whose
    /// target cannot be resolved anymore is skipped rather than failing the
    /// export.
    async fn relationship_entry<C: ConnectionTrait>(
        edge: &relationship::Model,
        source: &FullProductName,
        connection: &C,
    ) -> Result<Option<(String, String, String, Relationship)>, Error> {
        let target = match node::Entity::find_by_id(edge.target_node_id)
            .one(connection)
            .await?
        {
            Some(target) => target,
            None => {
                log::debug!("skipping edge {} with unresolvable target", edge.id);
                return Ok(None);
            }
        };

        let target_product = match target.parent_id {
            Some(parent_id) => match node::Entity::find_by_id(parent_id).one(connection).await? {
                Some(product) => product,
                None => {
                    log::debug!("skipping edge {} with orphaned target", edge.id);
                    return Ok(None);
                }
            },
            None => {
                log::debug!("skipping edge {} with orphaned target", edge.id);
                return Ok(None);
            }
        };

        let entry = Relationship {
            category: edge.category,
            product_reference: source.clone(),
            relates_to_product_reference: FullProductName {
                product_id: target.id.to_string(),
                name: format!("{} {}", target_product.name, target.name),
                product_identification_helper: None,
            },
        };

        Ok(Some((
            edge.category.to_string(),
            target_product.name.clone(),
            target.name.clone(),
            entry,
        )))
    }
}
