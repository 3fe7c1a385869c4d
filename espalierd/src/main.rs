use clap::Parser;
use std::process::{ExitCode, Termination};

mod db;
mod export;
mod sample_data;

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Manage the database schema.
    Db(db::Run),
    /// Load a small sample product graph.
    Seed(sample_data::Run),
    /// Export a CSAF product tree for a set of products.
    Export(export::Run),
}

#[derive(clap::Parser, Debug)]
#[command(
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "espalierd",
    long_about = None
)]
pub struct Espalierd {
    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Espalierd {
    async fn run(self) -> ExitCode {
        match self.run_command().await {
            Ok(code) => code,
            Err(err) => {
                log::error!("Error: {err}");
                for (n, err) in err.chain().skip(1).enumerate() {
                    if n == 0 {
                        log::error!("Caused by:");
                    }
                    log::error!("\t{err}");
                }

                ExitCode::FAILURE
            }
        }
    }

    async fn run_command(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Db(run) => run.run().await,
            Command::Seed(run) => run.run().await,
            Command::Export(run) => run.run().await,
        }
    }
}

#[tokio::main]
async fn main() -> impl Termination {
    env_logger::init();
    Espalierd::parse().run().await
}
