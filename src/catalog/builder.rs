use std::time::Duration;

use log::{debug, info, trace};

use crate::catalog::config::{CatalogConfig, CatalogParams};
use crate::catalog::record::BoreholeRecord;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::wfs::{FeaturePager, FeatureService, WfsClient};

/// This struct holds the NVCL boreholes found inside the configured region.
///
/// Building never fails. Problems are logged, kept in `diagnostics()` and
/// leave the catalog smaller or not ready.
#[derive(Debug)]
pub struct Catalog {
    config: Option<CatalogConfig>,
    boreholes: Vec<BoreholeRecord>,
    diagnostics: Diagnostics,
    ready: bool,
}

impl Catalog {
    /// Validate `params` and build the catalog from `service`.
    pub fn build<S: FeatureService + ?Sized>(params: &CatalogParams, service: &S) -> Self {
        let mut diagnostics = Diagnostics::default();

        match CatalogConfig::from_params(params) {
            Ok(config) => Self::assemble(config, service, diagnostics),
            Err(error) => {
                diagnostics.report(Diagnostic::Config(error));
                Self::not_ready(None, diagnostics)
            }
        }
    }

    /// Validate `params` and build the catalog from the configured WFS over HTTP.
    pub fn connect(params: &CatalogParams, timeout: Duration) -> Self {
        let mut diagnostics = Diagnostics::default();

        let config = match CatalogConfig::from_params(params) {
            Ok(config) => config,
            Err(error) => {
                diagnostics.report(Diagnostic::Config(error));
                return Self::not_ready(None, diagnostics);
            }
        };

        match WfsClient::new(&config.wfs_url, &config.service_version, timeout) {
            Ok(client) => Self::assemble(config, &client, diagnostics),
            Err(fault) => {
                diagnostics.report(Diagnostic::Transport {
                    context: format!("client for {}", config.wfs_url),
                    fault,
                });
                Self::not_ready(Some(config), diagnostics)
            }
        }
    }

    /// Build the catalog from an already validated configuration.
    pub fn from_config<S: FeatureService + ?Sized>(config: CatalogConfig, service: &S) -> Self {
        Self::assemble(config, service, Diagnostics::default())
    }

    fn assemble<S: FeatureService + ?Sized>(
        config: CatalogConfig,
        service: &S,
        mut diagnostics: Diagnostics,
    ) -> Self {
        let views = FeaturePager::new(service, &config).fetch(&mut diagnostics);
        if views.is_empty() {
            debug!("No borehole views retrieved from {}", config.wfs_url);
            return Self::not_ready(Some(config), diagnostics);
        }

        let limit = config.limit();
        let mut boreholes = Vec::new();

        for view in &views {
            let record = match BoreholeRecord::from_view(view, &config) {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(error) => {
                    diagnostics.report(Diagnostic::Coordinates(error));
                    continue;
                }
            };

            if !config.region.contains(record.x, record.y) {
                trace!(
                    "Borehole `{}` at ({}, {}) is outside the region",
                    record.id,
                    record.x,
                    record.y
                );
                continue;
            }

            boreholes.push(record);

            if limit.map_or(false, |limit| boreholes.len() >= limit) {
                debug!("Reached the limit of {} boreholes", boreholes.len());
                break;
            }
        }

        info!(
            "Catalog holds {} of {} borehole views",
            boreholes.len(),
            views.len()
        );

        Self {
            config: Some(config),
            boreholes,
            diagnostics,
            ready: true,
        }
    }

    fn not_ready(config: Option<CatalogConfig>, diagnostics: Diagnostics) -> Self {
        Self {
            config,
            boreholes: Vec::new(),
            diagnostics,
            ready: false,
        }
    }

    /// The boreholes in the order the service returned them.
    pub fn boreholes(&self) -> &[BoreholeRecord] {
        &self.boreholes
    }

    pub fn nvcl_ids(&self) -> Vec<&str> {
        self.boreholes
            .iter()
            .map(|borehole| borehole.id.as_str())
            .collect()
    }

    /// Did the service deliver any borehole views?
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// The validated configuration, `None` if validation failed.
    pub fn config(&self) -> Option<&CatalogConfig> {
        self.config.as_ref()
    }
}
