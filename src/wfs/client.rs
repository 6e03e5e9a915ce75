use std::time::Duration;

use log::debug;

use crate::catalog::config::WFS_VERSION_2;
use crate::error::{TransportFault, TransportFaultKind};
use crate::xml::{self, Element};

/// Parameters of one WFS `GetFeature` request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetFeatureRequest {
    pub type_name: String,
    pub filter: Option<String>,
    pub srs_name: Option<String>,
    pub max_features: Option<usize>,
    pub start_index: Option<usize>,
}

/// A source of WFS `GetFeature` responses.
pub trait FeatureService {
    /// Issue one request and return the raw response body.
    fn get_feature(&self, request: &GetFeatureRequest) -> Result<Vec<u8>, TransportFault>;
}

/// This struct talks WFS over HTTP using key-value-pair `GET` requests.
#[derive(Debug)]
pub struct WfsClient {
    client: reqwest::blocking::Client,
    url: String,
    version: String,
}

impl WfsClient {
    pub fn new(url: &str, version: &str, timeout: Duration) -> Result<Self, TransportFault> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
            version: version.to_string(),
        })
    }

    fn query(&self, request: &GetFeatureRequest) -> Vec<(&'static str, String)> {
        // WFS 2.0.0 renamed two of the parameters
        let (type_key, count_key) = if self.version == WFS_VERSION_2 {
            ("typeNames", "count")
        } else {
            ("typeName", "maxFeatures")
        };

        let mut query = vec![
            ("service", "WFS".to_string()),
            ("version", self.version.clone()),
            ("request", "GetFeature".to_string()),
            (type_key, request.type_name.clone()),
        ];
        if let Some(srs_name) = &request.srs_name {
            query.push(("srsName", srs_name.clone()));
        }
        if let Some(filter) = &request.filter {
            query.push(("filter", filter.clone()));
        }
        if let Some(max_features) = request.max_features {
            query.push((count_key, max_features.to_string()));
        }
        if let Some(start_index) = request.start_index {
            query.push(("startIndex", start_index.to_string()));
        }

        query
    }
}

impl FeatureService for WfsClient {
    fn get_feature(&self, request: &GetFeatureRequest) -> Result<Vec<u8>, TransportFault> {
        debug!("GetFeature {} with {:?}", self.url, request);

        let body = self
            .client
            .get(&self.url)
            .query(&self.query(request))
            .send()?
            .error_for_status()?
            .bytes()?
            .to_vec();

        match xml::root_name(&body).as_deref() {
            Some("ExceptionReport") | Some("ServiceExceptionReport") => Err(TransportFault::new(
                TransportFaultKind::Protocol,
                exception_text(&body),
            )),
            _ => Ok(body),
        }
    }
}

/// The message of an OWS or WMS/WFS 1.0 exception report.
fn exception_text(body: &[u8]) -> String {
    let report = match Element::parse(body) {
        Ok(report) => report,
        Err(_) => return "service exception".to_string(),
    };

    report
        .select(&["Exception", "ExceptionText"])
        .into_iter()
        .chain(report.select(&["ServiceException"]))
        .map(|element| element.text.trim())
        .find(|text| !text.is_empty())
        .unwrap_or("service exception")
        .to_string()
}
