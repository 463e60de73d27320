use crate::config::ScoringWeights;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const VIDEO_LINK_PREFIX: &str = "https://www.bilibili.com/video/";

/// The seven interaction counters reported for a video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Counters {
    pub view: u64,
    pub like: u64,
    pub danmaku: u64,
    pub reply: u64,
    pub favorite: u64,
    pub share: u64,
    pub coin: u64,
}

impl Counters {
    /// Per-counter growth since `previous`. A counter that went down counts
    /// as zero growth.
    pub fn delta_since(&self, previous: &Counters) -> Counters {
        Counters {
            view: self.view.saturating_sub(previous.view),
            like: self.like.saturating_sub(previous.like),
            danmaku: self.danmaku.saturating_sub(previous.danmaku),
            reply: self.reply.saturating_sub(previous.reply),
            favorite: self.favorite.saturating_sub(previous.favorite),
            share: self.share.saturating_sub(previous.share),
            coin: self.coin.saturating_sub(previous.coin),
        }
    }

    pub fn weighted_sum(&self, weights: &ScoringWeights) -> u64 {
        [
            (self.view, weights.view),
            (self.like, weights.like),
            (self.danmaku, weights.danmaku),
            (self.reply, weights.reply),
            (self.favorite, weights.favorite),
            (self.share, weights.share),
            (self.coin, weights.coin),
        ]
        .iter()
        .fold(0u64, |acc, (value, weight)| {
            acc.saturating_add(value.saturating_mul(*weight))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerStat {
    pub follower: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Owner {
    pub mid: u64,
    pub name: String,
    pub stat: OwnerStat,
}

impl Default for Owner {
    fn default() -> Self {
        Self {
            mid: 0,
            name: "N/A".to_string(),
            stat: OwnerStat::default(),
        }
    }
}

/// One video record as returned by the listing API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawItem {
    pub bvid: String,
    pub title: String,
    pub owner: Owner,
    pub stat: Counters,
}

impl Default for RawItem {
    fn default() -> Self {
        Self {
            bvid: String::new(),
            title: "unknown title".to_string(),
            owner: Owner::default(),
            stat: Counters::default(),
        }
    }
}

/// Counters recorded for one video at the end of a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub counters: Counters,
}

/// Identifier → last observed counters. Ordered so the persisted file is
/// stable between runs.
pub type Snapshot = BTreeMap<String, SnapshotEntry>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub bvid: String,
    pub title: String,
    pub link: String,
    pub uploader_name: String,
    pub total_view: u64,
    pub total_reply: u64,
    pub delta: Counters,
    pub opportunity_index: f64,
    pub growth_score: u64,
    pub final_score: f64,
}

pub fn video_link(bvid: &str) -> String {
    format!("{}{}", VIDEO_LINK_PREFIX, bvid)
}
