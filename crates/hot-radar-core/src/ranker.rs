use crate::config::ScoringWeights;
use crate::model::{video_link, RankedEntry, RawItem, Snapshot, SnapshotEntry};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankStats {
    pub raw_items: usize,
    pub unique_items: usize,
    /// Items with no entry in the previous snapshot.
    pub first_sightings: usize,
    /// Items seen before whose weighted growth was zero.
    pub without_growth: usize,
    pub ranked: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Ranking {
    /// Sorted by final score, highest first.
    pub entries: Vec<RankedEntry>,
    /// Every item observed this cycle; replaces the stored snapshot.
    pub snapshot: Snapshot,
    pub stats: RankStats,
}

/// Collapse repeated identifiers. The data of the last occurrence wins while
/// the item keeps the position of its first occurrence. Records without an
/// identifier are dropped.
pub fn dedup_last_wins(items: &[RawItem]) -> Vec<&RawItem> {
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(items.len());
    let mut unique: Vec<&RawItem> = Vec::with_capacity(items.len());

    for item in items {
        if item.bvid.is_empty() {
            continue;
        }
        match positions.get(item.bvid.as_str()) {
            Some(&idx) => unique[idx] = item,
            None => {
                positions.insert(item.bvid.as_str(), unique.len());
                unique.push(item);
            }
        }
    }

    unique
}

/// Compare the current fetch against the previous snapshot and rank the
/// items that grew.
pub fn rank(items: &[RawItem], previous: &Snapshot, weights: &ScoringWeights) -> Ranking {
    let unique = dedup_last_wins(items);
    debug!("Deduplicated {} raw items into {} unique", items.len(), unique.len());

    let mut stats = RankStats {
        raw_items: items.len(),
        unique_items: unique.len(),
        ..RankStats::default()
    };
    let mut snapshot = Snapshot::new();
    let mut entries: Vec<RankedEntry> = Vec::new();

    for item in unique {
        let current = item.stat;
        snapshot.insert(
            item.bvid.clone(),
            SnapshotEntry {
                title: item.title.clone(),
                counters: current,
            },
        );

        let Some(prior) = previous.get(&item.bvid) else {
            stats.first_sightings += 1;
            continue;
        };

        let delta = current.delta_since(&prior.counters);
        let growth_score = delta.weighted_sum(weights);
        if growth_score == 0 {
            stats.without_growth += 1;
            continue;
        }

        let opportunity_index = delta.view as f64 / (current.reply as f64 + 1.0);
        let final_score = growth_score as f64 * opportunity_index;

        entries.push(RankedEntry {
            bvid: item.bvid.clone(),
            title: item.title.clone(),
            link: video_link(&item.bvid),
            uploader_name: item.owner.name.clone(),
            total_view: current.view,
            total_reply: current.reply,
            delta,
            opportunity_index,
            growth_score,
            final_score,
        });
    }

    // stable: equal scores stay in fetch order
    entries.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    stats.ranked = entries.len();

    Ranking {
        entries,
        snapshot,
        stats,
    }
}
