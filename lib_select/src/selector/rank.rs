use super::config::{RankOrder, SelectionConfig};
use super::model::{RankedResult, RankedServer, ServerRecord};
use crate::geo::GeoPoint;

/// Distances closer than this (miles) are treated as a tie.
pub const DISTANCE_EPSILON: f64 = 1e-6;

struct Scored<'a> {
    server: &'a ServerRecord,
    load: u8,
    distance: f64,
}

/// Ranks `candidates` against `config` and returns at most
/// `config.result_count` entries, best first.
///
/// Records failing validation or any active filter are skipped. An empty
/// return value means nothing met the criteria; it is not an error. The
/// input slice is never modified and the output depends only on the inputs,
/// so identical calls yield identical results.
pub fn select(candidates: &[ServerRecord], config: &SelectionConfig) -> RankedResult {
    let total = candidates.len();
    let mut pool: Vec<&ServerRecord> = candidates.iter().collect();

    if let Some(country) = &config.country {
        let before = pool.len();
        pool.retain(|s| s.country.eq_ignore_ascii_case(country));
        report_dropped(before, pool.len(), &format!("non-{} servers", country));
    }

    if !config.required_categories.is_empty() {
        let before = pool.len();
        pool.retain(|s| config.required_categories.iter().all(|c| s.has_category(c)));
        report_dropped(before, pool.len(), "servers missing a required category");
    }

    if !config.required_features.is_empty() {
        let before = pool.len();
        pool.retain(|s| config.required_features.iter().all(|f| s.has_feature(f)));
        report_dropped(before, pool.len(), "servers missing a required feature");
    }

    let before = pool.len();
    let mut scored: Vec<Scored<'_>> = pool
        .into_iter()
        .filter_map(|server| score(server, &config.location))
        .collect();
    report_dropped(before, scored.len(), "servers with invalid location or load");

    if let Some(max_load) = config.max_load {
        let before = scored.len();
        scored.retain(|s| s.load <= max_load);
        report_dropped(before, scored.len(), "servers with load too high");
    }

    if let Some(max_distance) = config.max_distance {
        let before = scored.len();
        scored.retain(|s| s.distance <= max_distance);
        report_dropped(before, scored.len(), "servers with distance too far");
    }

    match config.rank_order {
        RankOrder::Distance => rank_by_distance(&mut scored),
        RankOrder::Load => scored.sort_by(|a, b| {
            a.load.cmp(&b.load).then_with(|| a.distance.total_cmp(&b.distance))
        }),
    }

    log::info!("Selecting from {} of {} servers", scored.len(), total);

    scored
        .into_iter()
        .take(config.result_count)
        .map(|s| RankedServer {
            server: s.server.clone(),
            distance: s.distance,
        })
        .collect()
}

fn score<'a>(server: &'a ServerRecord, origin: &GeoPoint) -> Option<Scored<'a>> {
    let position = server.position();
    let load = server.valid_load();
    match (position, load) {
        (Some(position), Some(load)) => Some(Scored {
            server,
            load,
            distance: origin.distance_to(&position),
        }),
        _ => {
            log::debug!("Skipping {}: missing or invalid location/load", server.id);
            None
        }
    }
}

/// Stable sort by distance, then reorder each run of near-equal distances by
/// load. A run is anchored at its closest member so grouping is transitive.
fn rank_by_distance(scored: &mut [Scored<'_>]) {
    scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let mut start = 0;
    while start < scored.len() {
        let anchor = scored[start].distance;
        let end = scored[start..]
            .iter()
            .position(|s| s.distance - anchor > DISTANCE_EPSILON)
            .map_or(scored.len(), |offset| start + offset);
        scored[start..end].sort_by_key(|s| s.load);
        start = end;
    }
}

fn report_dropped(before: usize, after: usize, what: &str) {
    if before > after {
        log::info!("Filtered out {} {}", before - after, what);
    }
}
