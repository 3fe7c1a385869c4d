use std::process::ExitCode;

use espalier_common::{config, db::Database};
use espalier_module_csaf::ExportService;
use uuid::Uuid;

#[derive(clap::Args, Debug)]
pub struct Run {
    /// Product id to export; repeat for multiple products.
    #[arg(id = "product", long = "product", required = true, value_name = "ID")]
    pub(crate) products: Vec<Uuid>,
    #[command(flatten)]
    pub(crate) database: config::Database,
}

impl Run {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let db = Database::new(&self.database).await?;

        let document = ExportService::new(db.clone())
            .export_product_tree(&self.products, ())
            .await?;
        println!("{}", serde_json::to_string_pretty(&document)?);

        db.close().await?;
        Ok(ExitCode::SUCCESS)
    }
}
