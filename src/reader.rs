use std::time::Duration;

use failure::{Error, Fail};
use log::{debug, warn};

use crate::catalog::config::DEFAULT_DEPTH_RANGE;
use crate::catalog::{BoreholeRecord, Catalog, CatalogParams};
use crate::nvcl::{
    self, Dataset, DepthClass, DownsampleOptions, ImageLog, MosaicFilter, MosaicLog,
    MosaicOptions, NvclService, PlotOptions, ProfilometerLog, ScalarLog, SpectralLog, TrayDepth,
};
use crate::wfs::FeatureService;

/// This error occurs when log data is requested from a reader without boreholes.
#[derive(Debug, Fail)]
#[fail(display = "The NVCL reader is not ready, no boreholes were found")]
pub struct ReaderNotReady;

/// This struct finds NVCL boreholes and retrieves their log data.
///
/// Log data is only available when the catalog is ready.
#[derive(Debug)]
pub struct NvclReader {
    catalog: Catalog,
    service: Option<NvclService>,
}

impl NvclReader {
    /// Build the catalog from the configured WFS and connect to the NVCL service.
    pub fn new(params: &CatalogParams, timeout: Duration) -> Self {
        Self::from_catalog(Catalog::connect(params, timeout), timeout)
    }

    /// Build the catalog from a given feature service.
    pub fn with_feature_service<S: FeatureService + ?Sized>(
        params: &CatalogParams,
        feature_service: &S,
        timeout: Duration,
    ) -> Self {
        Self::from_catalog(Catalog::build(params, feature_service), timeout)
    }

    fn from_catalog(catalog: Catalog, timeout: Duration) -> Self {
        let service = match catalog.config() {
            Some(config) if catalog.is_ready() => {
                match NvclService::new(&config.nvcl_url, timeout) {
                    Ok(service) => Some(service),
                    Err(fault) => {
                        warn!("Unable to set up the NVCL service client: {}", fault);
                        None
                    }
                }
            }
            _ => None,
        };

        Self { catalog, service }
    }

    pub fn is_ready(&self) -> bool {
        self.service.is_some()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn boreholes(&self) -> &[BoreholeRecord] {
        self.catalog.boreholes()
    }

    pub fn nvcl_ids(&self) -> Vec<&str> {
        self.catalog.nvcl_ids()
    }

    fn service(&self) -> Result<&NvclService, ReaderNotReady> {
        self.service.as_ref().ok_or(ReaderNotReady)
    }

    /// Algorithms and their output ids as returned by the service.
    pub fn get_algorithms(&self) -> Result<Vec<u8>, Error> {
        Ok(self.service()?.get_algorithms()?)
    }

    pub fn get_datasetid_list(&self, nvcl_id: &str) -> Result<Vec<String>, Error> {
        let body = self.service()?.get_dataset_collection(nvcl_id, false)?;
        Ok(nvcl::dataset_ids(&body)?)
    }

    pub fn get_dataset_list(&self, nvcl_id: &str) -> Result<Vec<Dataset>, Error> {
        let body = self.service()?.get_dataset_collection(nvcl_id, false)?;
        Ok(nvcl::datasets(&body)?)
    }

    /// Mosaic service logs of a dataset, restricted by log name.
    pub fn get_mosaic_logs(
        &self,
        dataset_id: &str,
        filter: MosaicFilter,
    ) -> Result<Vec<MosaicLog>, Error> {
        let body = self.service()?.get_log_collection(dataset_id, true)?;
        Ok(nvcl::mosaic_logs(&body, filter)?)
    }

    /// Core tray images as HTML.
    pub fn get_mosaic_image(&self, log_id: &str, options: &MosaicOptions) -> Result<Vec<u8>, Error> {
        Ok(self.service()?.get_mosaic(log_id, options)?)
    }

    /// Core tray thumbnails as HTML.
    pub fn get_tray_thumb_html(
        &self,
        dataset_id: &str,
        log_id: &str,
        options: &MosaicOptions,
    ) -> Result<Vec<u8>, Error> {
        Ok(self
            .service()?
            .get_mosaic_tray_thumbnail(dataset_id, log_id, options)?)
    }

    pub fn get_tray_thumb_jpg(&self, log_id: &str, sample_no: u32) -> Result<Vec<u8>, Error> {
        Ok(self.service()?.get_display_tray_thumb(log_id, sample_no)?)
    }

    pub fn get_tray_depths(&self, log_id: &str) -> Result<Vec<TrayDepth>, Error> {
        let body = self.service()?.get_image_tray_depth(log_id)?;
        Ok(nvcl::tray_depths(&body)?)
    }

    pub fn get_scalar_logs(&self, dataset_id: &str) -> Result<Vec<ScalarLog>, Error> {
        let body = self.service()?.get_log_collection(dataset_id, false)?;
        Ok(nvcl::scalar_logs(&body)?)
    }

    /// Raw scalar values as CSV.
    pub fn get_scalar_data(&self, log_ids: &[&str]) -> Result<Vec<u8>, Error> {
        Ok(self.service()?.download_scalar(log_ids)?)
    }

    pub fn get_sampled_scalar_data(
        &self,
        log_id: &str,
        options: &DownsampleOptions,
    ) -> Result<Vec<u8>, Error> {
        Ok(self.service()?.get_downsampled_data(log_id, options)?)
    }

    pub fn plot_scalar_png(&self, log_id: &str, options: &PlotOptions) -> Result<Vec<u8>, Error> {
        Ok(self.service()?.get_plot_scalar(log_id, options)?)
    }

    pub fn plot_scalars_html(&self, log_ids: &[&str], options: &PlotOptions) -> Result<Vec<u8>, Error> {
        Ok(self.service()?.get_plot_multi_scalar(log_ids, options)?)
    }

    pub fn get_imagelog_data(&self, nvcl_id: &str) -> Result<Vec<ImageLog>, Error> {
        let body = self.service()?.get_dataset_collection(nvcl_id, false)?;
        Ok(nvcl::image_logs(&body)?)
    }

    pub fn get_spectrallog_data(&self, nvcl_id: &str) -> Result<Vec<SpectralLog>, Error> {
        let body = self.service()?.get_dataset_collection(nvcl_id, false)?;
        Ok(nvcl::spectral_logs(&body)?)
    }

    pub fn get_profilometer_data(&self, nvcl_id: &str) -> Result<Vec<ProfilometerLog>, Error> {
        let body = self.service()?.get_dataset_collection(nvcl_id, false)?;
        Ok(nvcl::profilometer_logs(&body)?)
    }

    pub fn get_spectral_data(
        &self,
        spectral_log_id: &str,
        samples: Option<(u32, u32)>,
    ) -> Result<Vec<u8>, Error> {
        Ok(self.service()?.get_spectral_data(spectral_log_id, samples)?)
    }

    /// The dominant mineral class per depth of a log over the configured depth range.
    pub fn get_borehole_data(
        &self,
        log_id: &str,
        height_resolution: f64,
        class_name: &str,
    ) -> Result<Vec<DepthClass>, Error> {
        let (start_depth, end_depth) = self
            .catalog
            .config()
            .map_or(DEFAULT_DEPTH_RANGE, |config| config.depth_range);

        let body = self.service()?.get_downsampled_data(
            log_id,
            &DownsampleOptions {
                interval: Some(height_resolution),
                output_format: Some("json".to_string()),
                start_depth: Some(start_depth),
                end_depth: Some(end_depth),
            },
        )?;
        debug!("Downsampled data of {} has {} bytes", log_id, body.len());

        Ok(nvcl::dominant_classes(&body, class_name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mockito::Matcher;

    use crate::test_utils::{borehole_view, feature_collection, MockWebserver, ScriptedService};

    fn reader(nvcl_url: &str, views: &[String]) -> NvclReader {
        let service = ScriptedService::new(vec![Ok(
            feature_collection("1.1.0", views, None).into_bytes()
        )]);

        NvclReader::with_feature_service(
            &CatalogParams {
                wfs_url: Some("http://localhost/wfs".into()),
                nvcl_url: Some(nvcl_url.into()),
                depths: Some(vec![10.0, 20.0]),
                ..Default::default()
            },
            &service,
            Duration::from_secs(10),
        )
    }

    #[test]
    fn not_ready_without_boreholes() {
        let reader = reader("http://localhost/nvcl", &[]);

        assert!(!reader.is_ready());
        assert!(reader.boreholes().is_empty());

        let error = reader.get_datasetid_list("12991").unwrap_err();
        assert!(error.downcast_ref::<ReaderNotReady>().is_some());
        assert!(reader.get_algorithms().is_err());
    }

    #[test]
    fn dataset_ids_of_borehole() {
        let webserver = MockWebserver::from_text_with_query(
            "/nvcl/getDatasetCollection.html",
            Matcher::UrlEncoded("holeidentifier".into(), "12991".into()),
            "<DatasetCollection><Dataset><DatasetID>ds-1</DatasetID></Dataset></DatasetCollection>",
        );
        let reader = reader(
            &format!("{}/nvcl", webserver.webserver_root_url()),
            &[borehole_view("12991", "true", "145.0 -41.0")],
        );

        assert!(reader.is_ready());
        assert_eq!(reader.nvcl_ids(), vec!["12991"]);
        assert_eq!(reader.get_datasetid_list("12991").unwrap(), vec!["ds-1"]);
    }

    #[test]
    fn borehole_data_uses_depth_range() {
        let webserver = MockWebserver::from_json_with_query(
            "/nvcl/getDownsampledData.html",
            Matcher::AllOf(vec![
                Matcher::UrlEncoded("logid".into(), "log-1".into()),
                Matcher::UrlEncoded("outputformat".into(), "json".into()),
                Matcher::UrlEncoded("startdepth".into(), "10.0".into()),
                Matcher::UrlEncoded("enddepth".into(), "20.0".into()),
            ]),
            r#"[{"roundedDepth": 12.0, "classText": "KAOLINITE", "classCount": 3, "colour": 255}]"#,
        );
        let reader = reader(
            &format!("{}/nvcl", webserver.webserver_root_url()),
            &[borehole_view("12991", "true", "145.0 -41.0")],
        );

        let classes = reader.get_borehole_data("log-1", 2.0, "Min1 uTSAS").unwrap();

        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].depth, 12.0);
        assert_eq!(classes[0].class_text, "KAOLINITE");
    }

    #[test]
    fn service_faults_are_errors() {
        let webserver = MockWebserver::from_status("/nvcl/getLogCollection.html", 500);
        let reader = reader(
            &format!("{}/nvcl", webserver.webserver_root_url()),
            &[borehole_view("12991", "true", "145.0 -41.0")],
        );

        assert!(reader.get_scalar_logs("ds-1").is_err());
    }
}
