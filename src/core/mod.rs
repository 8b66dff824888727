pub mod catalog;
pub mod export;
pub mod order;
pub mod search;
pub mod session;

pub use crate::domain::model::{Dataset, OrderEntry, Record, SourceTag};
pub use crate::domain::ports::{ConfigProvider, DatasetSource, Storage};
pub use crate::utils::error::Result;
