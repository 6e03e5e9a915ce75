mod builder;
pub mod config;
mod record;
mod region;

pub use self::builder::Catalog;
pub use self::config::{BoxParams, CatalogConfig, CatalogParams, ConfigError};
pub use self::record::{BoreholeAttributes, BoreholeRecord, CoordinateParseError};
pub use self::region::{BoundingBox, Region};
