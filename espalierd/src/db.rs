use std::process::ExitCode;

use espalier_common::{config, db::Database};

#[derive(clap::Args, Debug)]
pub struct Run {
    #[command(subcommand)]
    pub(crate) command: Command,
    #[command(flatten)]
    pub(crate) database: config::Database,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Apply pending migrations.
    Migrate,
    /// Drop and re-create the schema.
    Refresh,
}

impl Run {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let db = Database::new(&self.database).await?;

        match self.command {
            Command::Migrate => db.migrate().await?,
            Command::Refresh => db.refresh().await?,
        }

        db.close().await?;
        Ok(ExitCode::SUCCESS)
    }
}
