//! Serve command handler.

use clap::Args;
use databank_core::config::AppConfig;

/// Run the HTTP service
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to listen on (overrides config and DATABANK_BIND)
    #[arg(short, long)]
    pub bind: Option<String>,
}

impl ServeCommand {
    pub async fn execute(&self, mut config: AppConfig) -> anyhow::Result<()> {
        if let Some(ref bind) = self.bind {
            config.bind = bind.clone();
        }
        config.validate()?;

        databank_server::run_server(&config).await
    }
}
