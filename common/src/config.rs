#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Database")]
#[group(id = "database")]
pub struct Database {
    /// SQLx connection URL, e.g. `sqlite://espalier.db?mode=rwc`.
    #[arg(
        id = "db-url",
        long,
        env = "DB_URL",
        default_value = "sqlite://espalier.db?mode=rwc"
    )]
    pub url: String,
}

impl Database {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}
