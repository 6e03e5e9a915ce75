use failure::Fail;
use serde::Deserialize;

use crate::catalog::region::{BoundingBox, Region};
use crate::xml;

pub const DEFAULT_CRS: &str = "EPSG:4326";
pub const DEFAULT_WFS_VERSION: &str = "1.1.0";
pub const DEFAULT_DEPTH_RANGE: (f64, f64) = (0.0, 10000.0);
/// The only WFS version that supports paging through the unfiltered feed.
pub const WFS_VERSION_2: &str = "2.0.0";

/// Bounding box edges as read from the settings, each may be missing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BoxParams {
    pub west: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub north: Option<f64>,
}

/// Catalog parameters as read from the settings, before validation.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub wfs_url: Option<String>,
    pub nvcl_url: Option<String>,
    pub bbox: Option<BoxParams>,
    pub polygon: Option<Vec<[f64; 2]>>,
    pub depths: Option<Vec<f64>>,
    pub borehole_crs: Option<String>,
    pub wfs_version: Option<String>,
    pub max_boreholes: Option<i64>,
    pub use_local_filtering: Option<bool>,
}

/// Validated catalog configuration with all defaults applied.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogConfig {
    pub wfs_url: String,
    pub nvcl_url: String,
    pub region: Region,
    pub depth_range: (f64, f64),
    pub crs: String,
    pub service_version: String,
    /// Zero or negative means unlimited.
    pub max_boreholes: i64,
    pub use_local_filtering: bool,
}

impl CatalogConfig {
    /// Validate `params` and fill in defaults.
    ///
    /// Checks run in a fixed order and the first violation is returned.
    pub fn from_params(params: &CatalogParams) -> Result<Self, ConfigError> {
        let region = validate_region(params)?;
        let depth_range = validate_depths(params.depths.as_deref())?;
        let wfs_url = required_url("wfs_url", params.wfs_url.as_ref())?;
        let nvcl_url = required_url("nvcl_url", params.nvcl_url.as_ref())?;

        let crs = match &params.borehole_crs {
            None => DEFAULT_CRS.to_string(),
            Some(crs) if is_epsg_code(crs) => crs.clone(),
            Some(_) => {
                return Err(ConfigError::new(
                    "borehole_crs",
                    "is not an EPSG string",
                ))
            }
        };

        let service_version = match &params.wfs_version {
            None => DEFAULT_WFS_VERSION.to_string(),
            Some(version) if version.starts_with(|c: char| c.is_ascii_digit()) => version.clone(),
            Some(_) => {
                return Err(ConfigError::new(
                    "wfs_version",
                    "is not a numeric string",
                ))
            }
        };

        Ok(Self {
            wfs_url,
            nvcl_url,
            region,
            depth_range,
            crs,
            service_version,
            max_boreholes: params.max_boreholes.unwrap_or(0),
            use_local_filtering: params.use_local_filtering.unwrap_or(false),
        })
    }

    /// The maximum number of boreholes to keep, `None` if unlimited.
    pub fn limit(&self) -> Option<usize> {
        if self.max_boreholes > 0 {
            Some(self.max_boreholes as usize)
        } else {
            None
        }
    }

    pub fn is_wfs_2(&self) -> bool {
        self.service_version == WFS_VERSION_2
    }

    /// GML namespace of feature identifiers for the configured service version.
    pub fn gml_namespace(&self) -> &'static str {
        if self.is_wfs_2() {
            xml::GML32
        } else {
            xml::GML
        }
    }
}

fn validate_region(params: &CatalogParams) -> Result<Region, ConfigError> {
    if let Some(ring) = &params.polygon {
        let closed = ring.len() >= 4 && ring.first() == ring.last();
        let finite = ring.iter().flatten().all(|value| value.is_finite());
        if !closed || !finite {
            return Err(ConfigError::new("polygon", "is not a closed linear ring"));
        }
        return Ok(Region::from_ring(ring));
    }

    let bbox = match &params.bbox {
        None => return Ok(Region::default()),
        Some(bbox) => bbox,
    };

    let edge = |name: &str, value: Option<f64>| {
        value.ok_or_else(|| ConfigError::new(format!("bbox.{}", name), "is missing"))
    };

    Ok(Region::BoundingBox(BoundingBox {
        west: edge("west", bbox.west)?,
        south: edge("south", bbox.south)?,
        east: edge("east", bbox.east)?,
        north: edge("north", bbox.north)?,
    }))
}

fn validate_depths(depths: Option<&[f64]>) -> Result<(f64, f64), ConfigError> {
    match depths {
        None => Ok(DEFAULT_DEPTH_RANGE),
        Some(&[min, max]) => {
            if !min.is_finite() || !max.is_finite() {
                Err(ConfigError::new("depths", "does not contain numerics"))
            } else if min < max {
                Ok((min, max))
            } else {
                Err(ConfigError::new(
                    "depths",
                    "minimum is not less than maximum",
                ))
            }
        }
        Some(_) => Err(ConfigError::new("depths", "does not have length of 2")),
    }
}

fn required_url(field: &str, url: Option<&String>) -> Result<String, ConfigError> {
    url.cloned()
        .ok_or_else(|| ConfigError::new(field, "is missing"))
}

/// Roughly checks for `EPSG:nnnn`.
fn is_epsg_code(crs: &str) -> bool {
    let suffix: Vec<char> = crs.chars().rev().take(4).collect();
    crs.to_uppercase().contains("EPSG:")
        && suffix.len() == 4
        && suffix.iter().all(|c| c.is_ascii_digit())
}

/// This error occurs when a catalog parameter is missing or malformed.
#[derive(Debug, Fail, PartialEq)]
#[fail(display = "'{}' parameter {}", field, reason)]
pub struct ConfigError {
    pub field: String,
    pub reason: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
