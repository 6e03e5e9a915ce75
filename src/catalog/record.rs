use failure::Fail;
use log::trace;
use serde::Serialize;

use crate::catalog::config::{CatalogConfig, DEFAULT_CRS};
use crate::xml::{Element, GML, GML32, GSMLP};

/// Shape text assumed when a view carries no geometry at all.
const DEFAULT_SHAPE: &str = "POINT(0.0 0.0)";

macro_rules! borehole_attributes {
    ($($field:ident => $tag:literal),+ $(,)?) => {
        /// Descriptive `gsmlp:BoreholeView` fields.
        /// Each one is empty when the response does not carry it.
        #[derive(Clone, Debug, Default, PartialEq, Serialize)]
        pub struct BoreholeAttributes {
            $(
                #[serde(rename = $tag)]
                pub $field: String,
            )+
        }

        impl BoreholeAttributes {
            /// Element names in GeoSciML BoreholeView order.
            pub const NAMES: &'static [&'static str] = &[$($tag),+];

            fn from_view(view: &Element) -> Self {
                Self {
                    $(
                        $field: view
                            .find_text(&[(GSMLP, $tag)])
                            .unwrap_or_default()
                            .to_string(),
                    )+
                }
            }

            /// Look up a field by its element name.
            pub fn get(&self, tag: &str) -> Option<&str> {
                match tag {
                    $($tag => Some(self.$field.as_str()),)+
                    _ => None,
                }
            }
        }
    };
}

borehole_attributes! {
    name => "name",
    description => "description",
    purpose => "purpose",
    status => "status",
    drilling_method => "drillingMethod",
    operator => "operator",
    driller => "driller",
    drill_start_date => "drillStartDate",
    drill_end_date => "drillEndDate",
    start_point => "startPoint",
    inclination_type => "inclinationType",
    borehole_material_custodian => "boreholeMaterialCustodian",
    borehole_length_m => "boreholeLength_m",
    elevation_m => "elevation_m",
    elevation_srs => "elevation_srs",
    positional_accuracy => "positionalAccuracy",
    source => "source",
    parent_borehole_uri => "parentBorehole_uri",
    metadata_uri => "metadata_uri",
    generic_symbolizer => "genericSymbolizer",
}

/// This struct describes one NVCL borehole as listed by the feature service.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoreholeRecord {
    #[serde(rename = "nvcl_id")]
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub href: String,
    #[serde(skip)]
    pub collection_flag: bool,
    #[serde(flatten)]
    pub attributes: BoreholeAttributes,
}

impl BoreholeRecord {
    /// Read a record from a `gsmlp:BoreholeView` element.
    ///
    /// Returns `Ok(None)` for boreholes outside the NVCL collection and an error
    /// if the collar coordinates are not numeric.
    pub fn from_view(
        view: &Element,
        config: &CatalogConfig,
    ) -> Result<Option<Self>, CoordinateParseError> {
        let id = feature_id(view, config.gml_namespace());

        let collection_flag = view
            .find_text(&[(GSMLP, "nvclCollection")])
            .map_or(false, |flag| flag.eq_ignore_ascii_case("true"));
        if !collection_flag {
            trace!("Borehole `{}` is not in the NVCL collection", id);
            return Ok(None);
        }

        let (raw, from_wkt) = match point_position(view) {
            Some(pos) => (pos, false),
            None => {
                let shape = view.find_text(&[(GSMLP, "shape")]).unwrap_or(DEFAULT_SHAPE);
                (wkt_point_body(shape), true)
            }
        };

        let (first, second) = match parse_pair(raw) {
            Some(pair) => pair,
            None => {
                return Err(CoordinateParseError {
                    id,
                    raw: raw.to_string(),
                })
            }
        };

        // Only lon/lat positions under plain EPSG:4326 keep their order.
        let (x, y) = if config.crs != DEFAULT_CRS || from_wkt {
            (second, first)
        } else {
            (first, second)
        };

        let z = view
            .find_text(&[(GSMLP, "elevation_m")])
            .and_then(|elevation| elevation.trim().parse().ok())
            .unwrap_or(0.0);

        let href = view
            .find_text(&[(GSMLP, "identifier")])
            .unwrap_or_default()
            .to_string();

        Ok(Some(Self {
            id,
            x,
            y,
            z,
            href,
            collection_flag,
            attributes: BoreholeAttributes::from_view(view),
        }))
    }
}

/// The leaf segment of the feature's dotted id, e.g. `12991` for `BoreholeView.12991`.
fn feature_id(view: &Element, gml_namespace: &str) -> String {
    let leaf = |value: Option<&str>| {
        value
            .and_then(|value| value.rsplit('.').next())
            .unwrap_or_default()
            .to_string()
    };

    let id = leaf(view.attribute(Some(gml_namespace), "id"));
    if id.is_empty() {
        leaf(view.attribute(None, "id"))
    } else {
        id
    }
}

fn point_position(view: &Element) -> Option<&str> {
    [GML, GML32].iter().find_map(|&gml| {
        view.find_text(&[(GSMLP, "shape"), (gml, "Point"), (gml, "pos")])
    })
}

/// `POINT(a b)` to `a b`.
fn wkt_point_body(shape: &str) -> &str {
    shape
        .trim()
        .splitn(2, '(')
        .nth(1)
        .unwrap_or_default()
        .trim_end_matches(')')
}

fn parse_pair(raw: &str) -> Option<(f64, f64)> {
    let mut numbers = raw.split_whitespace().map(str::parse::<f64>);
    match (numbers.next(), numbers.next()) {
        (Some(Ok(first)), Some(Ok(second))) => Some((first, second)),
        _ => None,
    }
}

/// This error occurs when a borehole's collar position is not a pair of numbers.
#[derive(Debug, Fail, PartialEq)]
#[fail(display = "Cannot parse collar coordinates of borehole `{}`: `{}`", id, raw)]
pub struct CoordinateParseError {
    pub id: String,
    pub raw: String,
}
