use crate::core::{ConfigProvider, SourceTag};
use crate::utils::error::{MercurialeError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MercurialeConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub export: ExportConfig,
    pub http: Option<HttpConfig>,
    pub session: Option<SessionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_folkestone")]
    pub folkestone: String,
    #[serde(default = "default_vendome")]
    pub vendome: String,
    #[serde(default = "default_washington")]
    pub washington: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    /// 可含 `{timestamp}`
    #[serde(default = "default_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub default_source: Option<String>,
}

fn default_folkestone() -> String {
    "data/mercuriale-folkestone.json".to_string()
}

fn default_vendome() -> String {
    "data/mercuriale-vendome.json".to_string()
}

fn default_washington() -> String {
    "data/mercuriale-washington.json".to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_filename() -> String {
    crate::core::export::EXPORT_FILENAME.to_string()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            folkestone: default_folkestone(),
            vendome: default_vendome(),
            washington: default_washington(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            filename: default_filename(),
        }
    }
}

impl MercurialeConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MercurialeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MercurialeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_HOST})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MercurialeError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn location(&self, source: SourceTag) -> &str {
        match source {
            SourceTag::Folkestone => &self.sources.folkestone,
            SourceTag::Vendome => &self.sources.vendome,
            SourceTag::Washington => &self.sources.washington,
        }
    }

    pub fn set_location(&mut self, source: SourceTag, location: String) {
        match source {
            SourceTag::Folkestone => self.sources.folkestone = location,
            SourceTag::Vendome => self.sources.vendome = location,
            SourceTag::Washington => self.sources.washington = location,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.http
            .as_ref()
            .and_then(|h| h.timeout_seconds)
            .map(Duration::from_secs)
    }

    pub fn set_default_source(&mut self, source: SourceTag) {
        self.session = Some(SessionConfig {
            default_source: Some(source.to_string()),
        });
    }

    /// 匯出檔名，`{timestamp}` 以本地時間代入
    pub fn resolved_filename(&self) -> String {
        self.export.filename.replace(
            "{timestamp}",
            &chrono::Local::now().format("%Y%m%d_%H%M%S").to_string(),
        )
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        for source in SourceTag::ALL {
            validation::validate_location(&format!("sources.{}", source), self.location(source))?;
        }

        validation::validate_path("export.output_path", &self.export.output_path)?;
        validation::validate_non_empty_string("export.filename", &self.export.filename)?;
        validation::validate_file_extensions(
            "export.filename",
            std::slice::from_ref(&self.export.filename),
            &["csv"],
        )?;

        if let Some(timeout) = self.http.as_ref().and_then(|h| h.timeout_seconds) {
            validation::validate_range("http.timeout_seconds", timeout, 1, 300)?;
        }

        if let Some(name) = self.session.as_ref().and_then(|s| s.default_source.as_ref()) {
            name.parse::<SourceTag>()
                .map_err(|_| MercurialeError::InvalidConfigValueError {
                    field: "session.default_source".to_string(),
                    value: name.clone(),
                    reason: "Expected one of: folkestone, vendome, washington".to_string(),
                })?;
        }

        Ok(())
    }
}

impl ConfigProvider for MercurialeConfig {
    fn source_location(&self, source: SourceTag) -> &str {
        self.location(source)
    }

    fn output_path(&self) -> &str {
        &self.export.output_path
    }

    fn export_filename(&self) -> String {
        self.resolved_filename()
    }

    fn default_source(&self) -> SourceTag {
        self.session
            .as_ref()
            .and_then(|s| s.default_source.as_deref())
            .and_then(|name| name.parse().ok())
            .unwrap_or_default()
    }
}

impl Validate for MercurialeConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
