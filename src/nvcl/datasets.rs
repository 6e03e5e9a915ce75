use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ParseFault;
use crate::xml::Element;

/// Scalar log types the plot and download services can handle.
const PLOTTABLE_LOG_TYPES: [&str; 4] = ["1", "2", "5", "6"];

/// A dataset of a borehole.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dataset {
    pub dataset_id: String,
    pub dataset_name: String,
    pub borehole_uri: Option<String>,
    pub tray_id: Option<String>,
    pub section_id: Option<String>,
    pub domain_id: Option<String>,
}

/// A public image log listed in a dataset collection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageLog {
    pub log_id: String,
    pub log_type: String,
    pub log_name: String,
    pub algorithmout_id: String,
}

/// A log of the mosaic service.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MosaicLog {
    pub log_id: String,
    pub log_name: String,
    pub sample_count: u64,
}

/// Selects mosaic logs by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MosaicFilter {
    All,
    Mosaic,
    TrayThumbnailImages,
    TrayImages,
    Imagery,
}

impl MosaicFilter {
    pub fn log_name(self) -> Option<&'static str> {
        match self {
            MosaicFilter::All => None,
            MosaicFilter::Mosaic => Some("Mosaic"),
            MosaicFilter::TrayThumbnailImages => Some("Tray Thumbnail Images"),
            MosaicFilter::TrayImages => Some("Tray Images"),
            MosaicFilter::Imagery => Some("Imagery"),
        }
    }

    fn matches(self, log_name: &str) -> bool {
        self.log_name()
            .map_or(true, |name| name.eq_ignore_ascii_case(log_name))
    }
}

/// A log usable with the scalar plot and download services.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScalarLog {
    pub log_id: String,
    pub log_name: String,
    pub is_public: Option<String>,
    pub log_type: String,
    pub algorithm_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpectralLog {
    pub log_id: String,
    pub log_name: String,
    pub wavelength_units: String,
    pub sample_count: u64,
    pub script_raw: String,
    /// `key=value;` assignments of `script_raw`.
    pub script: BTreeMap<String, String>,
    /// Empty if any value is not a number.
    pub wavelengths: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfilometerLog {
    pub log_id: String,
    pub log_name: String,
    pub sample_count: u64,
    pub floats_per_sample: f64,
    pub min_val: f64,
    pub max_val: f64,
}

/// Depth range of one core tray image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrayDepth {
    pub sample_no: String,
    pub start_value: String,
    pub end_value: String,
}

/// Ids of the datasets in a dataset collection.
pub fn dataset_ids(body: &[u8]) -> Result<Vec<String>, ParseFault> {
    Ok(elements(body, &["Dataset"])?
        .iter()
        .filter_map(|dataset| non_empty(dataset, "DatasetID"))
        .map(ToString::to_string)
        .collect())
}

/// Datasets that have both an id and a name.
pub fn datasets(body: &[u8]) -> Result<Vec<Dataset>, ParseFault> {
    let optional = |dataset: &Element, name| non_empty(dataset, name).map(ToString::to_string);

    Ok(elements(body, &["Dataset"])?
        .iter()
        .filter_map(|dataset| {
            Some(Dataset {
                dataset_id: non_empty(dataset, "DatasetID")?.to_string(),
                dataset_name: non_empty(dataset, "DatasetName")?.to_string(),
                borehole_uri: optional(dataset, "boreholeURI"),
                tray_id: optional(dataset, "trayID"),
                section_id: optional(dataset, "sectionID"),
                domain_id: optional(dataset, "domainID"),
            })
        })
        .collect())
}

/// Public image logs of all datasets in a dataset collection.
pub fn image_logs(body: &[u8]) -> Result<Vec<ImageLog>, ParseFault> {
    Ok(elements(body, &["*", "Logs", "Log"])?
        .iter()
        .filter(|log| log.local_text("ispublic") == Some("true"))
        .filter_map(|log| {
            Some(ImageLog {
                log_id: non_empty(log, "LogID")?.to_string(),
                log_type: non_empty(log, "logType")?.to_string(),
                log_name: non_empty(log, "logName")?.to_string(),
                algorithmout_id: log.local_text("algorithmoutID").unwrap_or_default().to_string(),
            })
        })
        .collect())
}

/// Logs of a mosaic log collection that pass `filter`.
pub fn mosaic_logs(body: &[u8], filter: MosaicFilter) -> Result<Vec<MosaicLog>, ParseFault> {
    Ok(elements(body, &["Log"])?
        .iter()
        .filter_map(|log| {
            Some(MosaicLog {
                log_id: non_empty(log, "LogID")?.to_string(),
                log_name: non_empty(log, "LogName")?.to_string(),
                sample_count: parse_or_default(log, "SampleCount"),
            })
        })
        .filter(|log| filter.matches(&log.log_name))
        .collect())
}

/// Logs of a scalar log collection that are not private and have a plottable type.
pub fn scalar_logs(body: &[u8]) -> Result<Vec<ScalarLog>, ParseFault> {
    Ok(elements(body, &["Log"])?
        .iter()
        .filter(|log| {
            !log.local_text("ispublic")
                .map_or(false, |flag| flag.eq_ignore_ascii_case("false"))
        })
        .filter_map(|log| {
            let log_type = non_empty(log, "logType")?;
            if !PLOTTABLE_LOG_TYPES.contains(&log_type) {
                return None;
            }

            Some(ScalarLog {
                log_id: non_empty(log, "LogID")?.to_string(),
                log_name: non_empty(log, "logName")?.to_string(),
                is_public: log.local_text("ispublic").map(ToString::to_string),
                log_type: log_type.to_string(),
                algorithm_id: non_empty(log, "algorithmoutID")?.to_string(),
            })
        })
        .collect())
}

/// Spectral logs of all datasets in a dataset collection.
pub fn spectral_logs(body: &[u8]) -> Result<Vec<SpectralLog>, ParseFault> {
    Ok(elements(body, &["*", "SpectralLogs", "SpectralLog"])?
        .iter()
        .map(|log| {
            let script_raw = text(log, "script");

            SpectralLog {
                log_id: text(log, "logID"),
                log_name: text(log, "logName"),
                wavelength_units: text(log, "wavelengthUnits"),
                sample_count: parse_or_default(log, "sampleCount"),
                script: parse_script(&script_raw),
                script_raw,
                wavelengths: parse_wavelengths(log.local_text("wavelengths").unwrap_or_default()),
            }
        })
        .collect())
}

/// Profilometer logs of all datasets in a dataset collection.
pub fn profilometer_logs(body: &[u8]) -> Result<Vec<ProfilometerLog>, ParseFault> {
    Ok(elements(body, &["*", "ProfilometerLogs", "ProfLog"])?
        .iter()
        .map(|log| ProfilometerLog {
            log_id: text(log, "logID"),
            log_name: text(log, "logName"),
            sample_count: parse_or_default(log, "sampleCount"),
            floats_per_sample: parse_or_default(log, "floatsPerSample"),
            min_val: parse_or_default(log, "minVal"),
            max_val: parse_or_default(log, "maxVal"),
        })
        .collect())
}

/// Tray depth ranges of an image log.
pub fn tray_depths(body: &[u8]) -> Result<Vec<TrayDepth>, ParseFault> {
    Ok(elements(body, &["ImageTray"])?
        .iter()
        .filter_map(|tray| {
            Some(TrayDepth {
                sample_no: non_empty(tray, "SampleNo")?.to_string(),
                start_value: non_empty(tray, "StartValue")?.to_string(),
                end_value: non_empty(tray, "EndValue")?.to_string(),
            })
        })
        .collect())
}

/// Parse `body` and clone the elements found along `path` below its root.
fn elements(body: &[u8], path: &[&str]) -> Result<Vec<Element>, ParseFault> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let root = Element::parse(body)?;
    Ok(root.select(path).into_iter().cloned().collect())
}

fn non_empty<'e>(element: &'e Element, name: &str) -> Option<&'e str> {
    element.local_text(name).filter(|text| !text.is_empty())
}

fn text(element: &Element, name: &str) -> String {
    element.local_text(name).unwrap_or_default().to_string()
}

fn parse_or_default<T: std::str::FromStr + Default>(element: &Element, name: &str) -> T {
    element
        .local_text(name)
        .and_then(|text| text.trim().parse().ok())
        .unwrap_or_default()
}

fn parse_script(script: &str) -> BTreeMap<String, String> {
    script
        .replace("; ", ";")
        .split(';')
        .filter_map(|assignment| {
            match assignment.split_once('=')? {
                ("", _) => None,
                (key, value) => Some((key.to_string(), value.to_string())),
            }
        })
        .collect()
}

fn parse_wavelengths(wavelengths: &str) -> Vec<f64> {
    wavelengths
        .split(',')
        .map(|value| value.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .unwrap_or_default()
}
