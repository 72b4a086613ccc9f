//! Edge interpolation: subdivide each edge's geometry
//! into equally-spaced points and materialize them as graph nodes, so
//! that candidate search (Component D) has dense, near-uniform sampling
//! along every road rather than just junction coordinates.

use tracematch_geometry::{haversine::haversine, stable_geo_id};

use crate::model::{Edge, Graph, NodeId};

/// Resample a `(lat, lon)` polyline to points spaced ~`step_m` meters
/// apart along its arc length. Endpoints are always preserved; interior
/// points are placed by walking the original polyline and linearly
/// interpolating within whichever segment holds each target distance.
/// Short edges (total length under `step_m`) are returned unchanged.
pub fn interpolate_geom(points: &[(f64, f64)], step_m: f64) -> Vec<(f64, f64)> {
    if points.len() < 2 || step_m <= 0.0 {
        return points.to_vec();
    }

    let segment_lengths: Vec<f64> = points
        .windows(2)
        .map(|w| haversine(w[0].0, w[0].1, w[1].0, w[1].1))
        .collect();
    let total: f64 = segment_lengths.iter().sum();
    if total <= step_m {
        return points.to_vec();
    }

    let n_segments = (total / step_m).round().max(1.0) as usize;
    let mut result = Vec::with_capacity(n_segments + 1);
    result.push(points[0]);

    let mut seg_idx = 0usize;
    let mut seg_start_dist = 0.0f64;
    for i in 1..n_segments {
        let target = total * (i as f64) / (n_segments as f64);
        while seg_idx < segment_lengths.len()
            && seg_start_dist + segment_lengths[seg_idx] < target
        {
            seg_start_dist += segment_lengths[seg_idx];
            seg_idx += 1;
        }
        let seg_idx = seg_idx.min(segment_lengths.len() - 1);
        let seg_len = segment_lengths[seg_idx];
        let t = if seg_len > 0.0 { (target - seg_start_dist) / seg_len } else { 0.0 };
        let t = t.clamp(0.0, 1.0);
        let (lat0, lon0) = points[seg_idx];
        let (lat1, lon1) = points[seg_idx + 1];
        result.push((lat0 + (lat1 - lat0) * t, lon0 + (lon1 - lon0) * t));
    }

    result.push(*points.last().unwrap());
    result
}

/// Replace every edge's geometry with an equally-spaced resampling and
/// materialize each interior sample point as a graph node, chaining
/// short edges between them. Junction nodes (the original graph's node
/// set) keep their ids; interior points get a deterministic id derived
/// from their coordinates.
pub fn interpolate_graph(graph: &Graph, step_m: f64) -> Graph {
    let mut out = Graph::new();
    for (&id, n) in &graph.nodes {
        out.add_node(id, n.lat, n.lon);
    }

    for edge in &graph.edges {
        let resampled = interpolate_geom(&edge.geometry, step_m);
        if resampled.len() <= 2 {
            out.push_edge(edge.clone());
            continue;
        }

        let mut chain_ids: Vec<NodeId> = Vec::with_capacity(resampled.len());
        chain_ids.push(edge.u);
        for point in &resampled[1..resampled.len() - 1] {
            let id = stable_geo_id(point.1, point.0) as NodeId;
            out.add_node(id, point.0, point.1);
            chain_ids.push(id);
        }
        chain_ids.push(edge.v);

        for (u_idx, pair) in chain_ids.windows(2).enumerate() {
            let (u, v) = (pair[0], pair[1]);
            let geometry = resampled[u_idx..=u_idx + 1].to_vec();
            let length_m = tracematch_geometry::haversine::polyline_length(&geometry);
            out.push_edge(Edge {
                u,
                v,
                key: 0,
                osmid: edge.osmid,
                geometry,
                length_m,
                oneway: edge.oneway,
                tags: edge.tags.clone(),
            });
        }
    }

    out.meta = graph.meta.clone();
    out.meta.interpolated = true;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_edge_is_left_unchanged() {
        let pts = vec![(0.0, 0.0), (0.0, 0.00001)];
        let resampled = interpolate_geom(&pts, 50.0);
        assert_eq!(resampled, pts);
    }

    #[test]
    fn long_edge_gets_interior_points() {
        let pts = vec![(0.0, 0.0), (0.0, 0.01)];
        // ~1100m total; 10m step should yield well over 2 points.
        let resampled = interpolate_geom(&pts, 10.0);
        assert!(resampled.len() > 2);
        assert_eq!(resampled[0], pts[0]);
        assert_eq!(*resampled.last().unwrap(), pts[1]);
    }

    #[test]
    fn interior_points_are_roughly_equally_spaced() {
        let pts = vec![(0.0, 0.0), (0.0, 0.01)];
        let resampled = interpolate_geom(&pts, 10.0);
        let dists: Vec<f64> = resampled
            .windows(2)
            .map(|w| haversine(w[0].0, w[0].1, w[1].0, w[1].1))
            .collect();
        let max = dists.iter().cloned().fold(f64::MIN, f64::max);
        let min = dists.iter().cloned().fold(f64::MAX, f64::min);
        assert!(max - min < 1.0, "spacing should be nearly uniform, got {dists:?}");
    }

    #[test]
    fn interpolate_graph_materializes_interior_nodes() {
        use crate::model::{Edge, Graph};
        use crate::tags::TagBag;

        let mut g = Graph::new();
        g.add_node(1, 0.0, 0.0);
        g.add_node(2, 0.0, 0.01);
        g.push_edge(Edge {
            u: 1,
            v: 2,
            key: 0,
            osmid: 1,
            geometry: vec![(0.0, 0.0), (0.0, 0.01)],
            length_m: 1113.0,
            oneway: true,
            tags: TagBag::default(),
        });

        let interpolated = interpolate_graph(&g, 10.0);
        assert!(interpolated.node_count() > 2);
        assert!(interpolated.edge_count() > 1);
        assert!(interpolated.meta.interpolated);
    }
}
