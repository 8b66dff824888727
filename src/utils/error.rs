use crate::domain::model::SourceTag;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MercurialeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to load mercuriale '{source_tag}': {message}")]
    LoadError {
        source_tag: SourceTag,
        message: String,
    },

    #[error("Cet article de la mercuriale \"{source_tag}\" est déjà dans la liste de commande.")]
    DuplicateEntry { code: String, source_tag: SourceTag },

    #[error("Order list is empty, nothing to export")]
    EmptyOrder,

    #[error("Unknown mercuriale: {value}")]
    UnknownSource { value: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MercurialeError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 使用者操作層級的錯誤，只需提示
            MercurialeError::DuplicateEntry { .. }
            | MercurialeError::EmptyOrder
            | MercurialeError::UnknownSource { .. } => ErrorSeverity::Low,
            MercurialeError::HttpError(_) => ErrorSeverity::Medium,
            MercurialeError::CsvError(_)
            | MercurialeError::SerializationError(_)
            | MercurialeError::ConfigError { .. }
            | MercurialeError::ConfigValidationError { .. }
            | MercurialeError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            MercurialeError::LoadError { .. } | MercurialeError::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            MercurialeError::LoadError { .. } => {
                "Erreur: Impossible de charger les fichiers de données.".to_string()
            }
            MercurialeError::HttpError(_) => {
                "Erreur réseau lors de la récupération des données.".to_string()
            }
            MercurialeError::EmptyOrder => {
                "La liste de commande est vide, rien à exporter.".to_string()
            }
            MercurialeError::ConfigError { .. }
            | MercurialeError::ConfigValidationError { .. }
            | MercurialeError::InvalidConfigValueError { .. } => {
                format!("Configuration invalide: {}", self)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MercurialeError::LoadError { .. } | MercurialeError::HttpError(_) => {
                "Check the dataset locations (--folkestone/--vendome/--washington) and restart the session"
            }
            MercurialeError::DuplicateEntry { .. } => {
                "Remove the existing entry first or pick another product"
            }
            MercurialeError::EmptyOrder => "Add at least one product before exporting",
            MercurialeError::UnknownSource { .. } => {
                "Use one of: folkestone, vendome, washington"
            }
            MercurialeError::ConfigError { .. }
            | MercurialeError::ConfigValidationError { .. }
            | MercurialeError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line arguments"
            }
            MercurialeError::IoError(_) => "Check file permissions and that the output directory is writable",
            MercurialeError::CsvError(_) | MercurialeError::SerializationError(_) => {
                "Check that the dataset files are valid JSON arrays"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, MercurialeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_names_source() {
        let err = MercurialeError::DuplicateEntry {
            code: "A1".to_string(),
            source_tag: SourceTag::Vendome,
        };
        assert_eq!(
            err.to_string(),
            "Cet article de la mercuriale \"vendome\" est déjà dans la liste de commande."
        );
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_load_error_is_critical() {
        let err = MercurialeError::LoadError {
            source_tag: SourceTag::Washington,
            message: "404".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("Impossible de charger"));
    }
}
