use failure::Fail;
use log::{debug, info};

use crate::catalog::config::CatalogConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::wfs::client::{FeatureService, GetFeatureRequest};
use crate::wfs::collection::FeatureCollection;
use crate::wfs::filter::PropertyIsLike;
use crate::xml::Element;

pub const BOREHOLE_VIEW_TYPE: &str = "gsmlp:BoreholeView";
/// Number of features requested per page of the unfiltered feed.
pub const PAGE_SIZE: usize = 10_000;

/// This struct retrieves the candidate `gsmlp:BoreholeView` elements for a catalog.
///
/// Without local filtering a single request carries a server-side filter on
/// `gsmlp:nvclCollection`. With local filtering the whole feed is paged
/// through, which needs WFS 2.0.0.
pub struct FeaturePager<'a, S: FeatureService + ?Sized> {
    service: &'a S,
    config: &'a CatalogConfig,
}

impl<'a, S: FeatureService + ?Sized> FeaturePager<'a, S> {
    pub fn new(service: &'a S, config: &'a CatalogConfig) -> Self {
        Self { service, config }
    }

    /// Fetch all candidate views. Faults are reported and end the fetch early.
    pub fn fetch(&self, diagnostics: &mut Diagnostics) -> Vec<Element> {
        if !self.config.use_local_filtering {
            self.fetch_filtered(diagnostics)
        } else if self.config.is_wfs_2() {
            self.fetch_pages(diagnostics)
        } else {
            diagnostics.report(Diagnostic::ModeConflict(ModeConflictError {
                version: self.config.service_version.clone(),
            }));
            Vec::new()
        }
    }

    fn fetch_filtered(&self, diagnostics: &mut Diagnostics) -> Vec<Element> {
        let filter = PropertyIsLike::nvcl_collection().to_filter_xml();

        let request = GetFeatureRequest {
            type_name: BOREHOLE_VIEW_TYPE.to_string(),
            filter: Some(filter.clone()),
            // not accepted together with a filter under 2.0.0
            srs_name: Some(self.config.crs.clone()).filter(|_| !self.config.is_wfs_2()),
            ..Default::default()
        };

        let body = match self.service.get_feature(&request) {
            Ok(body) => body,
            Err(fault) => {
                diagnostics.report(Diagnostic::Transport {
                    context: format!("filter={}", filter),
                    fault,
                });
                return Vec::new();
            }
        };

        match FeatureCollection::parse(&body) {
            Ok(collection) => {
                info!("Retrieved {} borehole views", collection.views.len());
                collection.views
            }
            Err(fault) => {
                diagnostics.report(Diagnostic::Parse(fault));
                Vec::new()
            }
        }
    }

    fn fetch_pages(&self, diagnostics: &mut Diagnostics) -> Vec<Element> {
        let mut views = Vec::new();
        let mut start_index = 0;

        loop {
            let request = GetFeatureRequest {
                type_name: BOREHOLE_VIEW_TYPE.to_string(),
                max_features: Some(PAGE_SIZE),
                start_index: Some(start_index),
                ..Default::default()
            };

            let body = match self.service.get_feature(&request) {
                Ok(body) => body,
                Err(fault) => {
                    diagnostics.report(Diagnostic::Transport {
                        context: format!("startIndex={}", start_index),
                        fault,
                    });
                    break;
                }
            };
            start_index += PAGE_SIZE;

            let page = match FeatureCollection::parse(&body) {
                Ok(page) => page,
                Err(fault) => {
                    diagnostics.report(Diagnostic::Parse(fault));
                    break;
                }
            };

            debug!(
                "Page ending at {} returned {:?} features",
                start_index, page.number_returned
            );
            views.extend(page.views);

            if page.number_returned.as_deref().unwrap_or("0") == "0" {
                break;
            }
        }

        info!("Retrieved {} borehole views", views.len());
        views
    }
}

/// This error occurs when local filtering is requested from a service version that cannot page.
#[derive(Debug, Fail, PartialEq)]
#[fail(
    display = "Cannot have local filtering with WFS version {}, it needs 2.0.0",
    version
)]
pub struct ModeConflictError {
    pub version: String,
}
