use crate::error::ParseFault;
use crate::xml::{Element, GSMLP};

/// This struct holds the borehole views of one `wfs:FeatureCollection` response.
#[derive(Debug, Default)]
pub struct FeatureCollection {
    /// The `numberReturned` attribute of WFS 2.0.0 responses.
    pub number_returned: Option<String>,
    pub views: Vec<Element>,
}

impl FeatureCollection {
    /// Parse a response body. An empty body is an empty collection.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseFault> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let root = Element::parse(bytes)?;

        let number_returned = root
            .attribute(None, "numberReturned")
            .map(ToString::to_string);

        // views sit one level down, below `gml:featureMembers` or `wfs:member`
        let views = root
            .children
            .into_iter()
            .flat_map(|member| member.children)
            .filter(|element| element.is(GSMLP, "BoreholeView"))
            .collect();

        Ok(Self {
            number_returned,
            views,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
