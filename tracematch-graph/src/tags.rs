//! Way/node tag model.
//!
//! A small closed set of recognised tags lives as named fields; anything
//! else is carried through unchanged in `extra` so callers that need a
//! tag this crate doesn't know about (e.g. `surface`, `lit`) can still
//! see it.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagBag {
    pub highway: Option<String>,
    pub oneway: Option<String>,
    pub lanes: Option<String>,
    pub maxspeed: Option<String>,
    pub junction: Option<String>,
    pub service: Option<String>,
    pub access: Option<String>,
    pub bridge: Option<String>,
    pub tunnel: Option<String>,
    pub extra: HashMap<String, String>,
}

impl TagBag {
    /// Partition a raw OSM tag map into recognised fields + `extra`.
    pub fn from_raw(mut raw: HashMap<String, String>) -> Self {
        let mut bag = TagBag {
            highway: raw.remove("highway"),
            oneway: raw.remove("oneway"),
            lanes: raw.remove("lanes"),
            maxspeed: raw.remove("maxspeed"),
            junction: raw.remove("junction"),
            service: raw.remove("service"),
            access: raw.remove("access"),
            bridge: raw.remove("bridge"),
            tunnel: raw.remove("tunnel"),
            extra: HashMap::new(),
        };
        bag.extra = raw;
        bag
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "highway" => self.highway.as_deref(),
            "oneway" => self.oneway.as_deref(),
            "lanes" => self.lanes.as_deref(),
            "maxspeed" => self.maxspeed.as_deref(),
            "junction" => self.junction.as_deref(),
            "service" => self.service.as_deref(),
            "access" => self.access.as_deref(),
            "bridge" => self.bridge.as_deref(),
            "tunnel" => self.tunnel.as_deref(),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// All tag values whose key starts with "oneway" — the canonical
    /// `oneway` field as well as sub-keys like `oneway:bicycle` that may
    /// have landed in `extra`.
    pub fn oneway_values(&self) -> HashSet<&str> {
        let mut values = HashSet::new();
        if let Some(v) = self.oneway.as_deref() {
            values.insert(v);
        }
        for (k, v) in &self.extra {
            if k.starts_with("oneway") {
                values.insert(v.as_str());
            }
        }
        values
    }
}

const NEGATIVE_ONEWAY_VALUES: &[&str] = &["no", "false", "0", "reversible", "alternating"];
const REVERSED_VALUES: &[&str] = &["-1", "reverse", "T"];

/// Is this way oneway, honoring a caller override to force bidirectional?
///
/// `junction=roundabout` forces oneway even without an explicit
/// `oneway` tag, correcting a common OSM tagging gap.
pub fn is_oneway(tags: &TagBag, force_bidirectional: bool) -> bool {
    if force_bidirectional {
        return false;
    }

    let negatives: HashSet<&str> = NEGATIVE_ONEWAY_VALUES.iter().copied().collect();
    let values = tags.oneway_values();
    let tagged_oneway = !values.is_empty() && values.is_disjoint(&negatives);

    tagged_oneway || tags.junction.as_deref() == Some("roundabout")
}

/// Is the way's node order reversed relative to its natural direction?
pub fn is_reversed(tags: &TagBag) -> bool {
    let reversed: HashSet<&str> = REVERSED_VALUES.iter().copied().collect();
    !tags.oneway_values().is_disjoint(&reversed)
}

/// The "drive" network filter, applied to already-parsed tags rather
/// than baked into an Overpass query string, since the HTTP download
/// itself is out of scope.
pub fn is_drivable(tags: &TagBag) -> bool {
    const EXCLUDED_HIGHWAY: &[&str] = &[
        "abandoned",
        "bridleway",
        "bus_guideway",
        "construction",
        "corridor",
        "cycleway",
        "elevator",
        "escalator",
        "footway",
        "path",
        "pedestrian",
        "planned",
        "platform",
        "proposed",
        "raceway",
        "steps",
        "track",
    ];
    const EXCLUDED_SERVICE: &[&str] = &["emergency_access", "parking", "parking_aisle", "private"];

    let Some(highway) = tags.highway.as_deref() else {
        return false;
    };
    if EXCLUDED_HIGHWAY.contains(&highway) {
        return false;
    }
    if tags.access.as_deref() == Some("private") {
        return false;
    }
    if tags.extra.get("area").map(String::as_str) == Some("yes") {
        return false;
    }
    if let Some(service) = tags.service.as_deref() {
        if EXCLUDED_SERVICE.contains(&service) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> TagBag {
        let raw: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        TagBag::from_raw(raw)
    }

    #[test]
    fn plain_oneway_yes() {
        let t = tags(&[("oneway", "yes")]);
        assert!(is_oneway(&t, false));
        assert!(!is_reversed(&t));
    }

    #[test]
    fn oneway_no_is_not_oneway() {
        let t = tags(&[("oneway", "no")]);
        assert!(!is_oneway(&t, false));
    }

    #[test]
    fn oneway_minus_one_is_oneway_and_reversed() {
        let t = tags(&[("oneway", "-1")]);
        assert!(is_oneway(&t, false));
        assert!(is_reversed(&t));
    }

    #[test]
    fn force_bidirectional_overrides_oneway_tag() {
        let t = tags(&[("oneway", "yes")]);
        assert!(!is_oneway(&t, true));
    }

    #[test]
    fn roundabout_without_oneway_tag_is_still_oneway() {
        let t = tags(&[("junction", "roundabout")]);
        assert!(is_oneway(&t, false));
    }

    #[test]
    fn drivable_excludes_footway() {
        let t = tags(&[("highway", "footway")]);
        assert!(!is_drivable(&t));
    }

    #[test]
    fn drivable_excludes_private_access() {
        let t = tags(&[("highway", "residential"), ("access", "private")]);
        assert!(!is_drivable(&t));
    }

    #[test]
    fn drivable_accepts_residential() {
        let t = tags(&[("highway", "residential")]);
        assert!(is_drivable(&t));
    }

    #[test]
    fn no_highway_tag_is_not_drivable() {
        let t = tags(&[("building", "yes")]);
        assert!(!is_drivable(&t));
    }
}
