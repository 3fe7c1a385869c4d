use test_context::test_context;
use test_log::test;
use uuid::Uuid;

use espalier_common::db::test::EspalierContext;
use espalier_common::model::Paginated;
use espalier_entity::identification_helper_category::IdentificationHelperCategory;
use espalier_entity::node_category::NodeCategory;

use crate::identification_helper::model::CreateIdentificationHelper;
use crate::identification_helper::service::IdentificationHelperService;
use crate::node::model::{
    CreateProduct, CreateProductFamily, CreateProductVersion, CreateVendor, LoadOptions,
    UpdateNode,
};
use crate::node::service::NodeService;
use crate::Error;

fn vendor(name: &str) -> CreateVendor {
    CreateVendor {
        name: name.to_string(),
        description: None,
    }
}

fn product(vendor_id: Uuid, name: &str) -> CreateProduct {
    CreateProduct {
        vendor_id,
        name: name.to_string(),
        description: None,
    }
}

fn version(product_id: Uuid, name: &str) -> CreateProductVersion {
    CreateProductVersion {
        product_id,
        name: name.to_string(),
        description: None,
        predecessor_id: None,
    }
}

#[test_context(EspalierContext, skip_teardown)]
#[test(tokio::test)]
async fn create_hierarchy_and_fetch(ctx: EspalierContext) -> Result<(), anyhow::Error> {
    let db = ctx.db;
    let service = NodeService::new(db.clone());

    let vendor = service.create_vendor(vendor("Red Hat")).await?;
    let product = service.create_product(product(vendor.id, "Trusted Profile Analyzer")).await?;
    let version = service.create_version(version(product.id, "1.0.0")).await?;

    let details = service
        .fetch_node(product.id, ())
        .await?
        .expect("product must exist");

    assert_eq!(details.head.category, NodeCategory::ProductName);
    assert_eq!(details.parent.as_ref().map(|p| p.id), Some(vendor.id));
    assert_eq!(details.children.len(), 1);
    assert_eq!(details.children[0].id, version.id);

    assert!(service.fetch_node(Uuid::new_v4(), ()).await?.is_none());

    Ok(())
}

#[test_context(EspalierContext, skip_teardown)]
#[test(tokio::test)]
async fn invalid_parents_are_rejected(ctx: EspalierContext) -> Result<(), anyhow::Error> {
    let db = ctx.db;
    let service = NodeService::new(db.clone());

    let err = service
        .create_product(product(Uuid::new_v4(), "orphan"))
        .await
        .expect_err("missing vendor must be rejected");
    assert!(matches!(err, Error::InvalidParent { .. }));

    // a version's parent must be a product, not a vendor
    let v = service.create_vendor(vendor("ACME")).await?;
    let err = service
        .create_version(version(v.id, "1.0.0"))
        .await
        .expect_err("vendor as version parent must be rejected");
    assert!(matches!(err, Error::InvalidParent { .. }));

    Ok(())
}

#[test_context(EspalierContext, skip_teardown)]
#[test(tokio::test)]
async fn delete_is_blocked_by_dependents(ctx: EspalierContext) -> Result<(), anyhow::Error> {
    let db = ctx.db;
    let service = NodeService::new(db.clone());
    let helpers = IdentificationHelperService::new(db.clone());

    let v = service.create_vendor(vendor("ACME")).await?;
    let p = service.create_product(product(v.id, "Widget")).await?;
    let ver = service.create_version(version(p.id, "1.0.0")).await?;
    let helper = helpers
        .create_helper(CreateIdentificationHelper {
            node_id: ver.id,
            category: IdentificationHelperCategory::Cpe,
            metadata: r#"{"cpe": "cpe:2.3:a:acme:widget:1.0.0:*:*:*:*:*:*:*"}"#.to_string(),
        })
        .await?;

    let err = service
        .delete_node(p.id)
        .await
        .expect_err("product with versions must not be deletable");
    assert!(matches!(err, Error::HasDependents(id) if id == p.id));

    let err = service
        .delete_node(ver.id)
        .await
        .expect_err("version with helpers must not be deletable");
    assert!(matches!(err, Error::HasDependents(id) if id == ver.id));

    // bottom-up teardown works
    helpers.delete_helper(helper.head.id).await?;
    service.delete_node(ver.id).await?;
    service.delete_node(p.id).await?;
    service.delete_node(v.id).await?;

    let err = service
        .delete_node(v.id)
        .await
        .expect_err("deleting twice must fail");
    assert!(matches!(err, Error::NotFound(_)));

    Ok(())
}

#[test_context(EspalierContext, skip_teardown)]
#[test(tokio::test)]
async fn update_patches_only_present_fields(ctx: EspalierContext) -> Result<(), anyhow::Error> {
    let db = ctx.db;
    let service = NodeService::new(db.clone());

    let v = service
        .create_vendor(CreateVendor {
            name: "ACME".to_string(),
            description: Some("original".to_string()),
        })
        .await?;

    let updated = service
        .update_node(
            v.id,
            UpdateNode {
                name: Some("ACME Corp".to_string()),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.name, "ACME Corp");
    assert_eq!(updated.description.as_deref(), Some("original"));

    let err = service
        .update_node(Uuid::new_v4(), UpdateNode::default())
        .await
        .expect_err("unknown node must not be updatable");
    assert!(matches!(err, Error::NotFound(_)));

    Ok(())
}

#[test_context(EspalierContext, skip_teardown)]
#[test(tokio::test)]
async fn family_parent_cycles_are_rejected(ctx: EspalierContext) -> Result<(), anyhow::Error> {
    let db = ctx.db;
    let service = NodeService::new(db.clone());

    let a = service
        .create_family(CreateProductFamily {
            name: "A".to_string(),
            description: None,
            parent_id: None,
        })
        .await?;
    let b = service
        .create_family(CreateProductFamily {
            name: "B".to_string(),
            description: None,
            parent_id: Some(a.id),
        })
        .await?;

    let err = service
        .update_node(
            a.id,
            UpdateNode {
                parent_id: Some(b.id),
                ..Default::default()
            },
        )
        .await
        .expect_err("a family must not become its own descendant's child");
    assert!(matches!(err, Error::Cycle(id) if id == a.id));

    // and a family can never be its own parent
    let err = service
        .update_node(
            a.id,
            UpdateNode {
                parent_id: Some(a.id),
                ..Default::default()
            },
        )
        .await
        .expect_err("self-parenting must be rejected");
    assert!(matches!(err, Error::Cycle(_)));

    Ok(())
}

#[test_context(EspalierContext, skip_teardown)]
#[test(tokio::test)]
async fn predecessors_stay_within_one_product(ctx: EspalierContext) -> Result<(), anyhow::Error> {
    let db = ctx.db;
    let service = NodeService::new(db.clone());

    let v = service.create_vendor(vendor("ACME")).await?;
    let p1 = service.create_product(product(v.id, "Widget")).await?;
    let p2 = service.create_product(product(v.id, "Gadget")).await?;
    let w1 = service.create_version(version(p1.id, "1.0.0")).await?;

    let err = service
        .create_version(CreateProductVersion {
            product_id: p2.id,
            name: "1.0.0".to_string(),
            description: None,
            predecessor_id: Some(w1.id),
        })
        .await
        .expect_err("cross-product predecessor must be rejected");
    assert!(matches!(err, Error::InvalidNode(id) if id == w1.id));

    Ok(())
}

#[test_context(EspalierContext, skip_teardown)]
#[test(tokio::test)]
async fn predecessor_cycles_are_rejected(ctx: EspalierContext) -> Result<(), anyhow::Error> {
    let db = ctx.db;
    let service = NodeService::new(db.clone());

    let v = service.create_vendor(vendor("ACME")).await?;
    let p = service.create_product(product(v.id, "Widget")).await?;
    let v1 = service.create_version(version(p.id, "1.0.0")).await?;
    let v2 = service
        .create_version(CreateProductVersion {
            product_id: p.id,
            name: "2.0.0".to_string(),
            description: None,
            predecessor_id: Some(v1.id),
        })
        .await?;

    let err = service
        .update_node(
            v1.id,
            UpdateNode {
                predecessor_id: Some(v2.id),
                ..Default::default()
            },
        )
        .await
        .expect_err("closing the chain into a loop must be rejected");
    assert!(matches!(err, Error::Cycle(id) if id == v1.id));

    Ok(())
}

#[test_context(EspalierContext, skip_teardown)]
#[test(tokio::test)]
async fn list_by_category_with_load_options(ctx: EspalierContext) -> Result<(), anyhow::Error> {
    let db = ctx.db;
    let service = NodeService::new(db.clone());

    let v = service.create_vendor(vendor("ACME")).await?;
    let p = service.create_product(product(v.id, "Widget")).await?;
    service.create_version(version(p.id, "1.0.0")).await?;
    service.create_version(version(p.id, "2.0.0")).await?;

    let bare = service
        .list_nodes_by_category(
            NodeCategory::ProductName,
            LoadOptions::default(),
            Paginated::default(),
            (),
        )
        .await?;
    assert_eq!(bare.total, 1);
    assert!(bare.items[0].children.is_empty());
    assert!(bare.items[0].parent.is_none());

    let loaded = service
        .list_nodes_by_category(
            NodeCategory::ProductName,
            LoadOptions {
                include_children: true,
                include_parent: true,
                include_relationships: true,
            },
            Paginated::default(),
            (),
        )
        .await?;
    assert_eq!(loaded.items[0].children.len(), 2);
    assert_eq!(loaded.items[0].parent.as_ref().map(|n| n.id), Some(v.id));

    let paged = service
        .list_nodes_by_category(
            NodeCategory::ProductVersion,
            LoadOptions::default(),
            Paginated {
                offset: 1,
                limit: 10,
            },
            (),
        )
        .await?;
    assert_eq!(paged.total, 2);
    assert_eq!(paged.items.len(), 1);

    Ok(())
}

#[test_context(EspalierContext, skip_teardown)]
#[test(tokio::test)]
async fn vendors_never_get_a_parent(ctx: EspalierContext) -> Result<(), anyhow::Error> {
    let db = ctx.db;
    let service = NodeService::new(db.clone());

    let a = service.create_vendor(vendor("A")).await?;
    let b = service.create_vendor(vendor("B")).await?;

    let err = service
        .update_node(
            a.id,
            UpdateNode {
                parent_id: Some(b.id),
                ..Default::default()
            },
        )
        .await
        .expect_err("vendors have no parent");
    assert!(matches!(err, Error::InvalidParent { .. }));

    Ok(())
}
