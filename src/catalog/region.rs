use geo::{Contains, LineString, Point, Polygon};

/// An axis-aligned region given by its four edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// The region searched when nothing else is configured.
    pub const SOUTHERN_HEMISPHERE: BoundingBox = BoundingBox {
        west: -180.0,
        south: -90.0,
        east: 180.0,
        north: 0.0,
    };

    /// Points on an edge are outside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.west < x && x < self.east && self.south < y && y < self.north
    }
}

/// The area boreholes must lie in to be kept in a catalog.
#[derive(Clone, Debug, PartialEq)]
pub enum Region {
    BoundingBox(BoundingBox),
    Polygon(Polygon<f64>),
}

impl Region {
    /// Build a polygon region from a closed ring of `[x, y]` pairs.
    pub fn from_ring(ring: &[[f64; 2]]) -> Self {
        let exterior: LineString<f64> = ring.iter().map(|&[x, y]| (x, y)).collect();
        Region::Polygon(Polygon::new(exterior, Vec::new()))
    }

    /// Is `(x, y)` strictly inside the region?
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            Region::BoundingBox(bbox) => bbox.contains(x, y),
            // `Contains` excludes the polygon boundary
            Region::Polygon(polygon) => polygon.contains(&Point::new(x, y)),
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::BoundingBox(BoundingBox::SOUTHERN_HEMISPHERE)
    }
}
