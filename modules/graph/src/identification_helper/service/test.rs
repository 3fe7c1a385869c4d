use test_context::test_context;
use test_log::test;
use uuid::Uuid;

use espalier_common::db::test::EspalierContext;
use espalier_common::db::Database;
use espalier_entity::identification_helper_category::IdentificationHelperCategory;

use crate::identification_helper::model::{
    CreateIdentificationHelper, UpdateIdentificationHelper,
};
use crate::identification_helper::service::IdentificationHelperService;
use crate::node::model::{CreateProduct, CreateProductVersion, CreateVendor};
use crate::node::service::NodeService;
use crate::Error;

async fn version(db: &Database) -> Result<Uuid, anyhow::Error> {
    let nodes = NodeService::new(db.clone());

    let vendor = nodes
        .create_vendor(CreateVendor {
            name: "ACME".to_string(),
            description: None,
        })
        .await?;
    let product = nodes
        .create_product(CreateProduct {
            vendor_id: vendor.id,
            name: "Widget".to_string(),
            description: None,
        })
        .await?;
    let version = nodes
        .create_version(CreateProductVersion {
            product_id: product.id,
            name: "1.0.0".to_string(),
            description: None,
            predecessor_id: None,
        })
        .await?;

    Ok(version.id)
}

#[test_context(EspalierContext, skip_teardown)]
#[test(tokio::test)]
async fn metadata_is_stored_verbatim(ctx: EspalierContext) -> Result<(), anyhow::Error> {
    let db = ctx.db;
    let node_id = version(&db).await?;
    let service = IdentificationHelperService::new(db.clone());

    // not even valid JSON; the store must not care
    let blob = "{ not json at all";
    let helper = service
        .create_helper(CreateIdentificationHelper {
            node_id,
            category: IdentificationHelperCategory::Purl,
            metadata: blob.to_string(),
        })
        .await?;

    let fetched = service
        .fetch_helper(helper.head.id, ())
        .await?
        .expect("helper must exist");
    assert_eq!(fetched.metadata, blob);
    assert_eq!(fetched.head.category, IdentificationHelperCategory::Purl);

    Ok(())
}

#[test_context(EspalierContext, skip_teardown)]
#[test(tokio::test)]
async fn helpers_attach_to_versions_only(ctx: EspalierContext) -> Result<(), anyhow::Error> {
    let db = ctx.db;
    let nodes = NodeService::new(db.clone());
    let service = IdentificationHelperService::new(db.clone());

    let vendor = nodes
        .create_vendor(CreateVendor {
            name: "ACME".to_string(),
            description: None,
        })
        .await?;

    let err = service
        .create_helper(CreateIdentificationHelper {
            node_id: vendor.id,
            category: IdentificationHelperCategory::Cpe,
            metadata: "{}".to_string(),
        })
        .await
        .expect_err("vendors do not carry identification helpers");
    assert!(matches!(err, Error::InvalidNode(id) if id == vendor.id));

    let err = service
        .create_helper(CreateIdentificationHelper {
            node_id: Uuid::new_v4(),
            category: IdentificationHelperCategory::Cpe,
            metadata: "{}".to_string(),
        })
        .await
        .expect_err("unknown nodes are rejected");
    assert!(matches!(err, Error::InvalidNode(_)));

    Ok(())
}

#[test_context(EspalierContext, skip_teardown)]
#[test(tokio::test)]
async fn fetch_helpers_for_node_lists_all(ctx: EspalierContext) -> Result<(), anyhow::Error> {
    let db = ctx.db;
    let node_id = version(&db).await?;
    let service = IdentificationHelperService::new(db.clone());

    service
        .create_helper(CreateIdentificationHelper {
            node_id,
            category: IdentificationHelperCategory::Sku,
            metadata: r#"{"skus": ["WDG-1"]}"#.to_string(),
        })
        .await?;
    service
        .create_helper(CreateIdentificationHelper {
            node_id,
            category: IdentificationHelperCategory::Serial,
            metadata: r#"{"serial_numbers": ["0001"]}"#.to_string(),
        })
        .await?;

    let helpers = service.fetch_helpers_for_node(node_id, ()).await?;
    assert_eq!(helpers.len(), 2);

    assert!(service
        .fetch_helpers_for_node(Uuid::new_v4(), ())
        .await?
        .is_empty());

    Ok(())
}

#[test_context(EspalierContext, skip_teardown)]
#[test(tokio::test)]
async fn update_patches_only_present_fields(ctx: EspalierContext) -> Result<(), anyhow::Error> {
    let db = ctx.db;
    let node_id = version(&db).await?;
    let service = IdentificationHelperService::new(db.clone());

    let helper = service
        .create_helper(CreateIdentificationHelper {
            node_id,
            category: IdentificationHelperCategory::Cpe,
            metadata: r#"{"cpe": "cpe:2.3:a:acme:widget:1.0.0:*:*:*:*:*:*:*"}"#.to_string(),
        })
        .await?;

    let updated = service
        .update_helper(
            helper.head.id,
            UpdateIdentificationHelper {
                metadata: Some(r#"{"cpe": "cpe:2.3:a:acme:widget:2.0.0:*:*:*:*:*:*:*"}"#.to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.head.category, IdentificationHelperCategory::Cpe);
    assert!(updated.metadata.contains("2.0.0"));

    let err = service
        .update_helper(Uuid::new_v4(), UpdateIdentificationHelper::default())
        .await
        .expect_err("unknown helper must not be updatable");
    assert!(matches!(err, Error::NotFound(_)));

    Ok(())
}

#[test_context(EspalierContext, skip_teardown)]
#[test(tokio::test)]
async fn delete_is_strict(ctx: EspalierContext) -> Result<(), anyhow::Error> {
    let db = ctx.db;
    let node_id = version(&db).await?;
    let service = IdentificationHelperService::new(db.clone());

    let helper = service
        .create_helper(CreateIdentificationHelper {
            node_id,
            category: IdentificationHelperCategory::Swid,
            metadata: r#"{"swid": "swid:acme-widget-1.0.0"}"#.to_string(),
        })
        .await?;

    service.delete_helper(helper.head.id).await?;

    let err = service
        .delete_helper(helper.head.id)
        .await
        .expect_err("unlike edge cleanup by category, helper deletion is strict");
    assert!(matches!(err, Error::NotFound(_)));

    Ok(())
}
