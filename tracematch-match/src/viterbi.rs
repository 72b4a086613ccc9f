//! HMM/Viterbi decoding.
//!
//! A layer-by-layer sweep over the trellis rather than a FIFO-queue walk
//! over a general DAG: the trellis is strictly layered by construction,
//! so there is nothing a queue buys over iterating layers in order. A
//! constant scalar applied to every transition score in some treatments
//! of this model is dropped here — in log domain it is an additive
//! constant and never changes which predecessor wins.

use std::f64::consts::{LOG10_E, PI};

use rayon::prelude::*;

use tracematch_geometry::haversine::haversine;

use crate::config::MatchConfig;
use crate::dijkstra::RouteCache;
use crate::error::MatchError;
use crate::trellis::{Trellis, TrellisNode};

/// Log (base 10, per spec) of the emission density
/// `p_e(d) = (1/(σ√(2π)))·exp(-(d/σ)²)`. The `exp(...)` term's natural-log
/// exponent is rescaled by `log10(e)` to keep the whole expression in
/// base 10.
pub fn emission_log_prob(dist_m: f64, sigma: f64) -> f64 {
    -(sigma * (2.0 * PI).sqrt()).log10() - (dist_m / sigma).powi(2) * LOG10_E
}

/// Log (base 10, per spec) of the transition density
/// `p_t(u,v) = (1/β)·exp(-|route(u,v) - haversine(u,v)|/β)`.
pub fn transition_log_prob(route_dist_m: f64, gc_dist_m: f64, beta: f64) -> f64 {
    -beta.log10() - (route_dist_m - gc_dist_m).abs() / beta * LOG10_E
}

fn transition_between(
    a: &TrellisNode,
    b: &TrellisNode,
    cfg: &MatchConfig,
    cache: &RouteCache,
) -> f64 {
    match (a, b) {
        (TrellisNode::Sentinel, _) | (_, TrellisNode::Sentinel) => 0.0,
        (TrellisNode::Candidate(ca), TrellisNode::Candidate(cb)) => {
            let Some(route) = cache.route(ca.node_id, cb.node_id) else {
                return f64::NEG_INFINITY;
            };
            let gc = haversine(ca.lat, ca.lon, cb.lat, cb.lon);
            transition_log_prob(route.length_m, gc, cfg.beta)
        }
    }
}

pub struct DecodeResult {
    /// Chosen candidate index within each observation's candidate set,
    /// in observation order (sentinels excluded).
    pub chosen: Vec<usize>,
    pub joint_log_prob: f64,
}

/// Run the forward Viterbi sweep over `trellis` and backtrack the best
/// path. `graph` must be the same (interpolated) graph the trellis's
/// candidates were drawn from.
pub fn decode(
    trellis: &Trellis,
    cfg: &MatchConfig,
    cache: &RouteCache,
) -> Result<DecodeResult, MatchError> {
    let num_layers = trellis.num_layers();
    let mut log_prob: Vec<Vec<f64>> = Vec::with_capacity(num_layers);
    let mut pred: Vec<Vec<Option<usize>>> = Vec::with_capacity(num_layers);

    log_prob.push(vec![0.0]);
    pred.push(vec![None]);

    for i in 1..num_layers {
        let prev_layer = &trellis.layers[i - 1];
        let prev_log = &log_prob[i - 1];
        let cur_layer = &trellis.layers[i];

        let results: Vec<(f64, Option<usize>)> = cur_layer
            .par_iter()
            .map(|node| {
                let emission = match node {
                    TrellisNode::Sentinel => 0.0,
                    TrellisNode::Candidate(c) => emission_log_prob(c.dist_m, cfg.sigma),
                };

                let mut best = f64::NEG_INFINITY;
                let mut best_k = None;
                for (k, prev_node) in prev_layer.iter().enumerate() {
                    if !prev_log[k].is_finite() {
                        continue;
                    }
                    let trans = transition_between(prev_node, node, cfg, cache);
                    if !trans.is_finite() {
                        continue;
                    }
                    let candidate_log = prev_log[k] + trans;
                    if candidate_log > best {
                        best = candidate_log;
                        best_k = Some(k);
                    }
                }

                if best_k.is_some() {
                    (best + emission, best_k)
                } else {
                    (f64::NEG_INFINITY, None)
                }
            })
            .collect();

        let (logs, preds): (Vec<f64>, Vec<Option<usize>>) = results.into_iter().unzip();
        log_prob.push(logs);
        pred.push(preds);
    }

    let last = num_layers - 1;
    let final_log = log_prob[last][0];
    if !final_log.is_finite() {
        return Err(MatchError::Unreachable);
    }

    let mut chosen_per_layer = vec![0usize; num_layers];
    let mut cur = 0usize;
    for i in (1..num_layers).rev() {
        chosen_per_layer[i] = cur;
        cur = pred[i][cur].ok_or(MatchError::Unreachable)?;
    }
    chosen_per_layer[0] = cur;

    let chosen = chosen_per_layer[1..last].to_vec();
    Ok(DecodeResult { chosen, joint_log_prob: final_log })
}
