use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;

use crate::error::TransportFault;

/// The scalar plot service draws at most this many logs.
pub const MAX_PLOTTED_LOGS: usize = 6;

/// Optional parameters of the mosaic and tray thumbnail services.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MosaicOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(rename = "startsampleno", skip_serializing_if = "Option::is_none")]
    pub start_sample_no: Option<u32>,
    #[serde(rename = "endsampleno", skip_serializing_if = "Option::is_none")]
    pub end_sample_no: Option<u32>,
}

/// Optional parameters of the scalar plot services.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PlotOptions {
    #[serde(rename = "startdepth", skip_serializing_if = "Option::is_none")]
    pub start_depth: Option<f64>,
    #[serde(rename = "enddepth", skip_serializing_if = "Option::is_none")]
    pub end_depth: Option<f64>,
    #[serde(rename = "samplinginterval", skip_serializing_if = "Option::is_none")]
    pub sampling_interval: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// 1 stacked bar, 2 scatter, 3 line chart.
    #[serde(rename = "graphtype", skip_serializing_if = "Option::is_none")]
    pub graph_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<u8>,
}

/// Parameters of the downsampled data service.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DownsampleOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<f64>,
    /// `csv` or `json`.
    #[serde(rename = "outputformat", skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(rename = "startdepth", skip_serializing_if = "Option::is_none")]
    pub start_depth: Option<f64>,
    #[serde(rename = "enddepth", skip_serializing_if = "Option::is_none")]
    pub end_depth: Option<f64>,
}

/// This struct wraps the endpoints of an NVCL data service.
/// Every call is a single `GET` that returns the raw response body.
#[derive(Debug)]
pub struct NvclService {
    client: Client,
    url: String,
}

impl NvclService {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, TransportFault> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
        })
    }

    /// Algorithms and their output ids.
    pub fn get_algorithms(&self) -> Result<Vec<u8>, TransportFault> {
        self.send(self.request("getAlgorithms.html"))
    }

    /// The datasets of a borehole, optionally only their headers.
    pub fn get_dataset_collection(
        &self,
        nvcl_id: &str,
        headers_only: bool,
    ) -> Result<Vec<u8>, TransportFault> {
        let mut request = self
            .request("getDatasetCollection.html")
            .query(&[("holeidentifier", nvcl_id)]);
        if headers_only {
            request = request.query(&[("headersOnly", "yes")]);
        }

        self.send(request)
    }

    /// The logs of a dataset, either the mosaic (image) logs or the scalar ones.
    pub fn get_log_collection(
        &self,
        dataset_id: &str,
        use_mosaic: bool,
    ) -> Result<Vec<u8>, TransportFault> {
        let mosaic_svc = if use_mosaic { "yes" } else { "no" };

        self.send(
            self.request("getLogCollection.html")
                .query(&[("datasetid", dataset_id), ("mosaicsvc", mosaic_svc)]),
        )
    }

    pub fn get_downsampled_data(
        &self,
        log_id: &str,
        options: &DownsampleOptions,
    ) -> Result<Vec<u8>, TransportFault> {
        self.send(
            self.request("getDownsampledData.html")
                .query(&[("logid", log_id)])
                .query(options),
        )
    }

    /// Core tray images as HTML.
    pub fn get_mosaic(&self, log_id: &str, options: &MosaicOptions) -> Result<Vec<u8>, TransportFault> {
        self.send(
            self.request("mosaic.html")
                .query(&[("logid", log_id)])
                .query(options),
        )
    }

    pub fn get_mosaic_tray_thumbnail(
        &self,
        dataset_id: &str,
        log_id: &str,
        options: &MosaicOptions,
    ) -> Result<Vec<u8>, TransportFault> {
        self.send(
            self.request("mosaictraythumbnail.html")
                .query(&[("datasetid", dataset_id), ("logid", log_id)])
                .query(options),
        )
    }

    /// A single tray thumbnail as JPEG.
    pub fn get_display_tray_thumb(
        &self,
        log_id: &str,
        sample_no: u32,
    ) -> Result<Vec<u8>, TransportFault> {
        self.send(
            self.request("Display_Tray_Thumb.html")
                .query(&[("logid", log_id.to_string()), ("sampleno", sample_no.to_string())]),
        )
    }

    pub fn get_image_tray_depth(&self, log_id: &str) -> Result<Vec<u8>, TransportFault> {
        self.send(self.request("getImageTrayDepth.html").query(&[("logid", log_id)]))
    }

    /// A plot of one scalar log as PNG.
    pub fn get_plot_scalar(&self, log_id: &str, options: &PlotOptions) -> Result<Vec<u8>, TransportFault> {
        self.send(
            self.request("plotscalar.html")
                .query(&[("logid", log_id)])
                .query(options),
        )
    }

    /// Plots of up to six scalar logs as HTML. Further log ids are ignored.
    pub fn get_plot_multi_scalar(
        &self,
        log_ids: &[&str],
        options: &PlotOptions,
    ) -> Result<Vec<u8>, TransportFault> {
        if log_ids.is_empty() {
            return Ok(Vec::new());
        }

        let log_ids = &log_ids[..log_ids.len().min(MAX_PLOTTED_LOGS)];
        self.send(
            self.request("plotmultiscalars.html")
                .query(&log_id_params(log_ids))
                .query(options),
        )
    }

    /// Raw scalar values as CSV.
    pub fn download_scalar(&self, log_ids: &[&str]) -> Result<Vec<u8>, TransportFault> {
        if log_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.send(self.request("downloadscalars.html").query(&log_id_params(log_ids)))
    }

    /// Binary spectral data, optionally restricted to a range of samples.
    pub fn get_spectral_data(
        &self,
        spectral_log_id: &str,
        samples: Option<(u32, u32)>,
    ) -> Result<Vec<u8>, TransportFault> {
        let mut request = self
            .request("getspectraldata.html")
            .query(&[("speclogid", spectral_log_id)]);
        if let Some((start, end)) = samples {
            request = request.query(&[("startsampleno", start), ("endsampleno", end)]);
        }

        self.send(request)
    }

    fn request(&self, endpoint: &str) -> RequestBuilder {
        self.client.get(&format!("{}/{}", self.url, endpoint))
    }

    fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, TransportFault> {
        let response = request.send()?.error_for_status()?;
        debug!("NVCL response from {}", response.url());

        Ok(response.bytes()?.to_vec())
    }
}

fn log_id_params<'a>(log_ids: &[&'a str]) -> Vec<(&'static str, &'a str)> {
    log_ids.iter().map(|&log_id| ("logid", log_id)).collect()
}
