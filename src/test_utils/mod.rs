mod webserver;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Write;

use tempfile::TempPath;

use crate::error::{TransportFault, TransportFaultKind};
use crate::wfs::{FeatureService, GetFeatureRequest};

pub use self::webserver::MockWebserver;

pub fn create_temp_file_with_suffix(suffix: &str, content: &str) -> TempPath {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Unable to create test file.");

    write!(file, "{}", content).expect("Unable to write content to test file.");

    file.into_temp_path()
}

/// A `gsmlp:BoreholeView` with a `gml:pos` position.
/// The `gml` prefix is bound by the enclosing `feature_collection`.
pub fn borehole_view(id: &str, nvcl_collection: &str, pos: &str) -> String {
    format!(
        r#"<gsmlp:BoreholeView gml:id="BoreholeView.{id}">
            <gsmlp:identifier>http://example.org/resource/feature/borehole/{id}</gsmlp:identifier>
            <gsmlp:name>Borehole {id}</gsmlp:name>
            <gsmlp:nvclCollection>{nvcl_collection}</gsmlp:nvclCollection>
            <gsmlp:shape>
                <gml:Point srsName="urn:ogc:def:crs:EPSG:4326"><gml:pos>{pos}</gml:pos></gml:Point>
            </gsmlp:shape>
        </gsmlp:BoreholeView>"#,
        id = id,
        nvcl_collection = nvcl_collection,
        pos = pos,
    )
}

/// A `wfs:FeatureCollection` in the layout of the given WFS version.
pub fn feature_collection(version: &str, views: &[String], number_returned: Option<&str>) -> String {
    let (wfs, gml, member) = if version == "2.0.0" {
        ("http://www.opengis.net/wfs/2.0", crate::xml::GML32, "wfs:member")
    } else {
        ("http://www.opengis.net/wfs", crate::xml::GML, "gml:featureMember")
    };

    let number_returned = number_returned
        .map(|number| format!(r#" numberReturned="{}""#, number))
        .unwrap_or_default();

    let members: String = views
        .iter()
        .map(|view| format!("<{member}>{view}</{member}>", member = member, view = view))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
        <wfs:FeatureCollection xmlns:wfs="{wfs}" xmlns:gml="{gml}"
            xmlns:gsmlp="{gsmlp}" numberOfFeatures="{count}"{number_returned}>{members}</wfs:FeatureCollection>"#,
        wfs = wfs,
        gml = gml,
        gsmlp = crate::xml::GSMLP,
        count = views.len(),
        number_returned = number_returned,
        members = members,
    )
}

/// A `FeatureService` that replays canned responses and records the requests it saw.
pub struct ScriptedService {
    responses: RefCell<VecDeque<Result<Vec<u8>, TransportFault>>>,
    requests: RefCell<Vec<GetFeatureRequest>>,
}

impl ScriptedService {
    pub fn new(responses: Vec<Result<Vec<u8>, TransportFault>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GetFeatureRequest> {
        self.requests.borrow().clone()
    }
}

impl FeatureService for ScriptedService {
    fn get_feature(&self, request: &GetFeatureRequest) -> Result<Vec<u8>, TransportFault> {
        self.requests.borrow_mut().push(request.clone());

        self.responses.borrow_mut().pop_front().unwrap_or_else(|| {
            Err(TransportFault::new(
                TransportFaultKind::Connection,
                "no scripted response left",
            ))
        })
    }
}
