use std::borrow::Cow;

use quick_xml::escape::escape;

use crate::xml::GSMLP;

const OGC: &str = "http://www.opengis.net/ogc";

/// An OGC `PropertyIsLike` comparison, the only filter the catalog sends.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyIsLike<'a> {
    pub property: &'a str,
    pub literal: &'a str,
    pub match_case: bool,
}

impl<'a> PropertyIsLike<'a> {
    /// Selects boreholes flagged as part of the NVCL collection.
    pub fn nvcl_collection() -> Self {
        Self {
            property: "gsmlp:nvclCollection",
            literal: "true",
            match_case: false,
        }
    }

    /// Render as an `ogc:Filter` document for the `filter` request parameter.
    pub fn to_filter_xml(&self) -> String {
        format!(
            concat!(
                r#"<ogc:Filter xmlns:ogc="{ogc}" xmlns:gsmlp="{gsmlp}">"#,
                r#"<ogc:PropertyIsLike wildCard="%" singleChar="_" escapeChar="\" matchCase="{match_case}">"#,
                "<ogc:PropertyName>{property}</ogc:PropertyName>",
                "<ogc:Literal>{literal}</ogc:Literal>",
                "</ogc:PropertyIsLike>",
                "</ogc:Filter>",
            ),
            ogc = OGC,
            gsmlp = GSMLP,
            match_case = self.match_case,
            property = escaped(self.property),
            literal = escaped(self.literal),
        )
    }
}

fn escaped(text: &str) -> Cow<str> {
    match escape(text.as_bytes()) {
        Cow::Borrowed(_) => Cow::Borrowed(text),
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    }
}
