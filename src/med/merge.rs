use std::cmp::Ordering;

use crate::model::{DocumentResult, Judgment};

fn topic_doc_order(topic: u32, doc_id: &str, other_topic: u32, other_doc_id: &str) -> Ordering {
    topic
        .cmp(&other_topic)
        .then_with(|| doc_id.cmp(other_doc_id))
}

/// Copies judged grades onto matching results.
///
/// Both slices must be sorted by (topic, docno). Results without a judgment
/// keep their current relevance. Returns the number of labelled results.
pub fn label_judgments(results: &mut [DocumentResult], judgments: &[Judgment]) -> usize {
    let (mut i, mut j) = (0, 0);
    let mut labelled = 0;

    while i < results.len() && j < judgments.len() {
        let result = &results[i];
        let judgment = &judgments[j];
        match topic_doc_order(
            result.topic,
            &result.doc_id,
            judgment.topic,
            &judgment.doc_id,
        ) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                results[i].relevance = Some(judgment.grade);
                labelled += 1;
                i += 1;
                j += 1;
            }
        }
    }

    labelled
}

/// Records, on both sides, the rank each docno holds in the other run.
///
/// Both slices must be sorted by (topic, docno). Returns the number of
/// documents retrieved by both runs.
pub fn cross_reference(left: &mut [DocumentResult], right: &mut [DocumentResult]) -> usize {
    let (mut i, mut j) = (0, 0);
    let mut shared = 0;

    while i < left.len() && j < right.len() {
        match topic_doc_order(
            left[i].topic,
            &left[i].doc_id,
            right[j].topic,
            &right[j].doc_id,
        ) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                left[i].opponent_rank = Some(right[j].rank);
                right[j].opponent_rank = Some(left[i].rank);
                shared += 1;
                i += 1;
                j += 1;
            }
        }
    }

    shared
}

pub fn sort_by_topic_and_doc(results: &mut [DocumentResult]) {
    results.sort_by(|a, b| topic_doc_order(a.topic, &a.doc_id, b.topic, &b.doc_id));
}

pub fn sort_by_topic_and_rank(results: &mut [DocumentResult]) {
    results.sort_by(|a, b| a.topic.cmp(&b.topic).then(a.rank.cmp(&b.rank)));
}
