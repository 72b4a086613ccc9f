//! Candidate search: for each observation, find nearby
//! points on interpolated edges within a radius and keep one per edge.

use std::collections::{HashMap, HashSet};

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use tracematch_geometry::haversine::haversine;
use tracematch_graph::{Graph, NodeId};

use crate::config::MatchConfig;
use crate::error::MatchError;

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub node_id: NodeId,
    pub edge_osmid: i64,
    pub lat: f64,
    pub lon: f64,
    pub dist_m: f64,
}

#[derive(Debug, Clone)]
pub struct CandidateSet {
    pub observation: (f64, f64),
    pub candidates: Vec<Candidate>,
    pub candidate_type: Vec<bool>,
}

impl CandidateSet {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    lon: f64,
    lat: f64,
    node_id: NodeId,
    edge_osmid: i64,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lon, self.lat])
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.lon - point[0];
        let dy = self.lat - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index over every (node, edge) incidence in an interpolated
/// graph: R-tree coarse prefilter, refined to exact haversine distance.
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    pub fn build(graph: &Graph) -> Self {
        let mut seen: HashSet<(NodeId, i64)> = HashSet::new();
        let mut points = Vec::new();
        for edge in &graph.edges {
            for (node_id, coord) in
                [(edge.u, graph.node_coord(edge.u)), (edge.v, graph.node_coord(edge.v))]
            {
                let Some((lat, lon)) = coord else { continue };
                if seen.insert((node_id, edge.osmid)) {
                    points.push(IndexedPoint { lon, lat, node_id, edge_osmid: edge.osmid });
                }
            }
        }
        SpatialIndex { tree: RTree::bulk_load(points) }
    }

    /// All indexed points within `radius_m` meters of `(lat, lon)`,
    /// refined from the R-tree's coarse degree-distance prefilter to
    /// exact haversine distance.
    ///
    /// The R-tree's `distance_2` is isotropic in `(lon, lat)` degree
    /// space, but a degree of longitude shrinks to `cos(lat)` degrees of
    /// latitude in meters away from the equator. Search with the
    /// longitude-direction degree radius (inflated by `1/cos(lat)`)
    /// rather than the latitude one, so the coarse prefilter always
    /// over-covers `radius_m` east–west; the exact haversine refinement
    /// below drops whatever it over-collects.
    fn query_radius(&self, lat: f64, lon: f64, radius_m: f64) -> Vec<Candidate> {
        let radius_deg_lat = (radius_m / tracematch_geometry::EARTH_RADIUS_M).to_degrees();
        let lat_scale = lat.to_radians().cos().abs().max(1e-6);
        let radius_deg = radius_deg_lat / lat_scale;
        let radius_deg_sq = radius_deg * radius_deg;

        self.tree
            .locate_within_distance([lon, lat], radius_deg_sq)
            .filter_map(|p| {
                let dist_m = haversine(lat, lon, p.lat, p.lon);
                (dist_m <= radius_m).then_some(Candidate {
                    node_id: p.node_id,
                    edge_osmid: p.edge_osmid,
                    lat: p.lat,
                    lon: p.lon,
                    dist_m,
                })
            })
            .collect()
    }
}

/// Produce one `CandidateSet` per observation.
pub fn find_candidates(
    index: &SpatialIndex,
    trajectory: &[(f64, f64)],
    cfg: &MatchConfig,
) -> Result<Vec<CandidateSet>, MatchError> {
    if trajectory.len() < 2 {
        return Err(MatchError::TooShort);
    }

    let sets = trajectory
        .iter()
        .map(|&(lat, lon)| {
            let mut hits = index.query_radius(lat, lon, cfg.radius);

            let candidates = if cfg.closest {
                let mut by_edge: HashMap<i64, Candidate> = HashMap::new();
                for hit in hits.drain(..) {
                    by_edge
                        .entry(hit.edge_osmid)
                        .and_modify(|existing| {
                            if hit.dist_m < existing.dist_m {
                                *existing = hit.clone();
                            }
                        })
                        .or_insert(hit);
                }
                let mut v: Vec<Candidate> = by_edge.into_values().collect();
                v.sort_by(|a, b| a.dist_m.total_cmp(&b.dist_m));
                v
            } else {
                hits.sort_by(|a, b| a.dist_m.total_cmp(&b.dist_m));
                hits
            };

            let candidate_type = vec![false; candidates.len()];
            CandidateSet { observation: (lat, lon), candidates, candidate_type }
        })
        .collect();

    Ok(sets)
}
