use serde::Serialize;

use crate::config::MedConfig;

/// One retrieved document of one run for one topic.
///
/// `relevance` is `None` while unjudged and `opponent_rank` is `None` when the
/// opposing run did not retrieve the same docno for the topic.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentResult {
    pub doc_id: String,
    pub topic: u32,
    pub rank: usize,
    pub opponent_rank: Option<usize>,
    pub relevance: Option<u8>,
    pub score: f64,
}

impl DocumentResult {
    pub fn new(topic: u32, doc_id: impl Into<String>, rank: usize, score: f64) -> Self {
        Self {
            doc_id: doc_id.into(),
            topic,
            rank,
            opponent_rank: None,
            relevance: None,
            score,
        }
    }
}

/// A loaded run. The run id is shared by every result.
#[derive(Debug, Clone)]
pub struct Run {
    pub run_id: String,
    pub results: Vec<DocumentResult>,
}

impl Run {
    pub fn topic_count(&self) -> usize {
        self.results
            .chunk_by(|left, right| left.topic == right.topic)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judgment {
    pub topic: u32,
    pub doc_id: String,
    pub grade: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopicScores {
    pub topic: u32,
    pub ndcg: f64,
    pub rbp: f64,
    pub err: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MeanScores {
    pub topics: usize,
    pub ndcg: f64,
    pub rbp: f64,
    pub err: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Aggregate {
    pub topics: Vec<TopicScores>,
    pub mean: MeanScores,
    pub skipped_left_only: usize,
    pub skipped_right_only: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub run1: String,
    pub run2: String,
    pub ndcg_depth: usize,
    pub topics: Vec<TopicScores>,
    pub mean: MeanScores,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputFingerprint {
    pub role: String,
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub tool_version: String,
    pub config: MedConfig,
    pub inputs: Vec<InputFingerprint>,
    pub skipped_left_only: usize,
    pub skipped_right_only: usize,
    pub report: ComparisonReport,
}
