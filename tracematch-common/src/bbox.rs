/// A geographic bounding box in decimal degrees.
///
/// Field order intentionally follows the N/S/W/E convention used
/// throughout the map-matching literature and OSM tooling, rather than
/// min/max-lat/lon, since it is the shape `graph_from_bbox` and the
/// Overpass-style query construction expect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl BBox {
    pub fn new(north: f64, south: f64, west: f64, east: f64) -> Self {
        Self {
            north,
            south,
            west,
            east,
        }
    }

    pub fn mean_lat(&self) -> f64 {
        (self.north + self.south) / 2.0
    }
}
