pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::SourceReader;
pub use crate::app::Console;
pub use crate::config::{cli::LocalStorage, MercurialeConfig};
pub use crate::core::{
    catalog::{Catalog, CatalogLoader},
    export::CsvExporter,
    order::OrderList,
    search::search,
    session::OrderSession,
};
pub use crate::utils::error::{MercurialeError, Result};
