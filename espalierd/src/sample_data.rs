use std::process::ExitCode;

use espalier_common::{config, db::Database};
use espalier_entity::identification_helper_category::IdentificationHelperCategory;
use espalier_entity::relationship_category::RelationshipCategory;
use espalier_module_graph::identification_helper::model::CreateIdentificationHelper;
use espalier_module_graph::identification_helper::service::IdentificationHelperService;
use espalier_module_graph::node::model::{CreateProduct, CreateProductVersion, CreateVendor};
use espalier_module_graph::node::service::NodeService;
use espalier_module_graph::relationship::model::CreateRelationship;
use espalier_module_graph::relationship::service::RelationshipService;

#[derive(clap::Args, Debug)]
pub struct Run {
    #[command(flatten)]
    pub(crate) database: config::Database,
}

impl Run {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let db = Database::new(&self.database).await?;
        db.migrate().await?;

        sample_data(&db).await?;

        db.close().await?;
        Ok(ExitCode::SUCCESS)
    }
}

pub async fn sample_data(db: &Database) -> anyhow::Result<()> {
    let nodes = NodeService::new(db.clone());
    let relationships = RelationshipService::new(db.clone());
    let helpers = IdentificationHelperService::new(db.clone());

    let vendor = nodes
        .create_vendor(CreateVendor {
            name: "Example Corporation".into(),
            description: Some("Sample vendor".into()),
        })
        .await?;

    let appliance = nodes
        .create_product(CreateProduct {
            vendor_id: vendor.id,
            name: "Example Appliance".into(),
            description: None,
        })
        .await?;
    let agent = nodes
        .create_product(CreateProduct {
            vendor_id: vendor.id,
            name: "Example Agent".into(),
            description: None,
        })
        .await?;

    let appliance_42 = nodes
        .create_version(CreateProductVersion {
            product_id: appliance.id,
            name: "4.2.0".into(),
            description: None,
            predecessor_id: None,
        })
        .await?;
    let appliance_43 = nodes
        .create_version(CreateProductVersion {
            product_id: appliance.id,
            name: "4.3.0".into(),
            description: None,
            predecessor_id: Some(appliance_42.id),
        })
        .await?;
    let agent_10 = nodes
        .create_version(CreateProductVersion {
            product_id: agent.id,
            name: "1.0.0".into(),
            description: None,
            predecessor_id: None,
        })
        .await?;

    helpers
        .create_helper(CreateIdentificationHelper {
            node_id: appliance_42.id,
            category: IdentificationHelperCategory::Cpe,
            metadata: r#"{"cpe": "cpe:2.3:a:example:appliance:4.2.0:*:*:*:*:*:*:*"}"#.into(),
        })
        .await?;
    helpers
        .create_helper(CreateIdentificationHelper {
            node_id: agent_10.id,
            category: IdentificationHelperCategory::Purl,
            metadata: r#"{"purl": "pkg:generic/example-agent@1.0.0"}"#.into(),
        })
        .await?;

    relationships
        .create_relationship(CreateRelationship {
            category: RelationshipCategory::InstalledOn,
            source_node_ids: vec![agent_10.id],
            target_node_ids: vec![appliance_42.id, appliance_43.id],
        })
        .await?;

    log::info!("sample data loaded");
    println!("vendor:    {}", vendor.id);
    println!("products:  {} {}", appliance.id, agent.id);

    Ok(())
}
