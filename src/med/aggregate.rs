use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::debug;

use super::err::ErrMax;
use super::measure::{MeasureKind, Maximizer};
use super::ndcg::NdcgMax;
use super::rbp::RbpMax;
use super::relevance::RelevanceTable;
use crate::config::MedConfig;
use crate::model::{Aggregate, DocumentResult, MeanScores, TopicScores};

/// The three maximizers built from one configuration.
#[derive(Debug, Clone)]
pub struct MeasureSuite {
    ndcg: NdcgMax,
    rbp: RbpMax,
    err: ErrMax,
}

impl MeasureSuite {
    pub fn from_config(config: &MedConfig) -> Self {
        let table = RelevanceTable::new(config.max_grade);
        Self {
            ndcg: NdcgMax::new(table.clone(), config.ndcg_depth),
            rbp: RbpMax::new(config.persistence, config.rbp_depth),
            err: ErrMax::new(
                table,
                config.err_depth,
                config.err_promotions,
                config.err_search,
            ),
        }
    }

    pub fn maximizers(&self) -> [&dyn Maximizer; 3] {
        [&self.ndcg, &self.rbp, &self.err]
    }

    pub fn score_topic(
        &self,
        topic: u32,
        left: &[DocumentResult],
        right: &[DocumentResult],
    ) -> TopicScores {
        let mut scores = TopicScores {
            topic,
            ndcg: 0.0,
            rbp: 0.0,
            err: 0.0,
        };

        for maximizer in self.maximizers() {
            let gap = maximizer.maximize(left, right);
            match maximizer.kind() {
                MeasureKind::Ndcg => scores.ndcg = gap,
                MeasureKind::Rbp => scores.rbp = gap,
                MeasureKind::Err => scores.err = gap,
            }
        }

        scores
    }
}

/// Contiguous same-topic slices of a (topic, rank) sorted run.
pub fn topic_slices(results: &[DocumentResult]) -> impl Iterator<Item = &[DocumentResult]> {
    results.chunk_by(|left, right| left.topic == right.topic)
}

pub struct TopicPairing<'a> {
    pub shared: Vec<(u32, &'a [DocumentResult], &'a [DocumentResult])>,
    pub left_only: Vec<u32>,
    pub right_only: Vec<u32>,
}

/// Walks both runs in lockstep, pairing topics retrieved by both.
pub fn pair_topics<'a>(left: &'a [DocumentResult], right: &'a [DocumentResult]) -> TopicPairing<'a> {
    let mut pairing = TopicPairing {
        shared: Vec::new(),
        left_only: Vec::new(),
        right_only: Vec::new(),
    };

    let mut left_topics = topic_slices(left).peekable();
    let mut right_topics = topic_slices(right).peekable();

    while let (Some(left_slice), Some(right_slice)) = (left_topics.peek(), right_topics.peek()) {
        let (left_topic, right_topic) = (left_slice[0].topic, right_slice[0].topic);
        match left_topic.cmp(&right_topic) {
            Ordering::Less => {
                pairing.left_only.push(left_topic);
                left_topics.next();
            }
            Ordering::Greater => {
                pairing.right_only.push(right_topic);
                right_topics.next();
            }
            Ordering::Equal => {
                pairing.shared.push((left_topic, *left_slice, *right_slice));
                left_topics.next();
                right_topics.next();
            }
        }
    }

    pairing
        .left_only
        .extend(left_topics.map(|slice| slice[0].topic));
    pairing
        .right_only
        .extend(right_topics.map(|slice| slice[0].topic));

    pairing
}

/// Scores every shared topic and averages over the topics scored.
///
/// Both runs must be sorted by (topic, rank). Topics are scored in parallel;
/// the output stays in topic order.
pub fn aggregate(
    suite: &MeasureSuite,
    left: &[DocumentResult],
    right: &[DocumentResult],
) -> Aggregate {
    let pairing = pair_topics(left, right);

    for topic in &pairing.left_only {
        debug!(topic, "topic missing from second run; skipped");
    }
    for topic in &pairing.right_only {
        debug!(topic, "topic missing from first run; skipped");
    }

    let topics: Vec<TopicScores> = pairing
        .shared
        .par_iter()
        .map(|(topic, left_slice, right_slice)| suite.score_topic(*topic, left_slice, right_slice))
        .collect();

    Aggregate {
        mean: mean_scores(&topics),
        topics,
        skipped_left_only: pairing.left_only.len(),
        skipped_right_only: pairing.right_only.len(),
    }
}

pub fn mean_scores(topics: &[TopicScores]) -> MeanScores {
    if topics.is_empty() {
        return MeanScores::default();
    }

    let count = topics.len() as f64;
    MeanScores {
        topics: topics.len(),
        ndcg: topics.iter().map(|scores| scores.ndcg).sum::<f64>() / count,
        rbp: topics.iter().map(|scores| scores.rbp).sum::<f64>() / count,
        err: topics.iter().map(|scores| scores.err).sum::<f64>() / count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::med::tests::{assert_close, build_runs};

    fn suite() -> MeasureSuite {
        MeasureSuite::from_config(&MedConfig::default())
    }

    #[test]
    fn topic_slices_split_on_topic_boundaries() {
        let (left, _) = build_runs(&[(1, "a b"), (4, "c")], &[], &[]);
        let sizes: Vec<_> = topic_slices(&left).map(<[DocumentResult]>::len).collect();
        assert_eq!(sizes, vec![2, 1]);
    }

    #[test]
    fn pair_topics_skips_topics_present_in_one_run() {
        let (left, right) = build_runs(
            &[(1, "a"), (2, "b"), (5, "c")],
            &[(2, "b"), (3, "d"), (5, "e"), (7, "f")],
            &[],
        );

        let pairing = pair_topics(&left, &right);
        let shared: Vec<_> = pairing.shared.iter().map(|(topic, _, _)| *topic).collect();
        assert_eq!(shared, vec![2, 5]);
        assert_eq!(pairing.left_only, vec![1]);
        assert_eq!(pairing.right_only, vec![3, 7]);
    }

    #[test]
    fn topic_absent_from_one_run_contributes_to_no_mean() {
        let (left, right) = build_runs(&[(1, "x"), (2, "a")], &[(2, "a")], &[]);

        let aggregate = aggregate(&suite(), &left, &right);

        assert_eq!(aggregate.topics.len(), 1);
        assert_eq!(aggregate.topics[0].topic, 2);
        assert_eq!(aggregate.mean.topics, 1);
        assert_eq!(aggregate.skipped_left_only, 1);
        assert_eq!(aggregate.skipped_right_only, 0);
        assert_eq!(aggregate.mean.err, aggregate.topics[0].err);
    }

    #[test]
    fn means_average_over_scored_topics() {
        let (left, right) = build_runs(
            &[(1, "x"), (2, "x y")],
            &[(1, "y"), (2, "x y")],
            &[],
        );

        let aggregate = aggregate(&suite(), &left, &right);

        assert_eq!(aggregate.mean.topics, 2);
        // topic 1: disjoint single free documents, topic 2: identical lists
        assert_close(aggregate.topics[0].err, 0.75);
        assert_close(aggregate.topics[1].err, 0.0);
        assert_close(aggregate.mean.err, 0.375);
        assert_close(
            aggregate.mean.rbp,
            (aggregate.topics[0].rbp + aggregate.topics[1].rbp) / 2.0,
        );
    }

    #[test]
    fn empty_runs_yield_a_zero_report() {
        let aggregate = aggregate(&suite(), &[], &[]);
        assert!(aggregate.topics.is_empty());
        assert_eq!(aggregate.mean, MeanScores::default());

        let (left, _) = build_runs(&[(1, "a")], &[], &[]);
        let one_sided = super::aggregate(&suite(), &left, &[]);
        assert_eq!(one_sided.mean, MeanScores::default());
        assert_eq!(one_sided.skipped_left_only, 1);
    }

    #[test]
    fn score_topic_routes_each_measure_to_its_field() {
        let (left, right) = build_runs(&[(9, "x y")], &[(9, "y x")], &[]);
        let suite = suite();
        let scores = suite.score_topic(9, &left, &right);

        assert_eq!(scores.topic, 9);
        let [ndcg, rbp, err] = suite.maximizers();
        assert_eq!(scores.ndcg, ndcg.maximize(&left, &right));
        assert_eq!(scores.rbp, rbp.maximize(&left, &right));
        assert_eq!(scores.err, err.maximize(&left, &right));
        assert_close(scores.err, 0.375);
    }
}
