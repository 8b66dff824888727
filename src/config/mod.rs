pub mod cli;
pub mod toml_config;

pub use toml_config::MercurialeConfig;

#[cfg(feature = "cli")]
use crate::core::SourceTag;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "mercuriale")]
#[command(about = "Search the mercuriales and build an order exported as CSV")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Location (path or http(s) URL) of the Folkestone mercuriale
    #[arg(long)]
    pub folkestone: Option<String>,

    /// Location of the Vendome mercuriale
    #[arg(long)]
    pub vendome: Option<String>,

    /// Location of the Washington mercuriale
    #[arg(long)]
    pub washington: Option<String>,

    /// Directory the CSV export is written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// Mercuriale searched at startup
    #[arg(long)]
    pub source: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入配置檔（沒有就用預設值），再套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<MercurialeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                MercurialeConfig::from_file(path)?
            }
            None => MercurialeConfig::default(),
        };

        let overrides = [
            (SourceTag::Folkestone, &self.folkestone),
            (SourceTag::Vendome, &self.vendome),
            (SourceTag::Washington, &self.washington),
        ];
        for (source, location) in overrides {
            if let Some(location) = location {
                tracing::info!("🔧 {} location overridden to: {}", source, location);
                config.set_location(source, location.clone());
            }
        }

        if let Some(output_path) = &self.output_path {
            config.export.output_path = output_path.clone();
        }

        if let Some(source) = &self.source {
            config.set_default_source(source.parse()?);
        }

        Ok(config)
    }
}
