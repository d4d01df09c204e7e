use crate::model::DocumentResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureKind {
    Ndcg,
    Rbp,
    Err,
}

/// One effectiveness measure that can bound the score gap between two runs
/// for a single topic.
///
/// Both slices hold the same topic, are sorted by rank with contiguous ranks
/// starting at 1, and carry merged relevance and opponent ranks. The result
/// is non-negative and does not depend on argument order.
pub trait Maximizer: Send + Sync {
    fn kind(&self) -> MeasureKind;

    fn maximize(&self, left: &[DocumentResult], right: &[DocumentResult]) -> f64;
}

/// How a document's relevance is decided when maximizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Judged(u8),
    /// Unjudged and retrieved by the opponent within its retained depth.
    Bound { opponent_rank: usize },
    /// Unjudged and absent from the opponent's retained results.
    Free,
}

impl Slot {
    pub fn classify(result: &DocumentResult, opponent_len: usize) -> Self {
        match (result.relevance, result.opponent_rank) {
            (Some(grade), _) => Self::Judged(grade),
            (None, Some(rank)) if rank <= opponent_len => Self::Bound {
                opponent_rank: rank,
            },
            (None, _) => Self::Free,
        }
    }
}

/// A measure whose worst case decomposes into independent per-document
/// terms: a rank discount times a grade gain, truncated at a fixed depth.
pub(crate) trait DiscountedMeasure {
    fn depth(&self) -> usize;

    fn discount(&self, rank: usize) -> f64;

    fn judged_gain(&self, grade: u8) -> f64;

    fn best_gain(&self) -> f64;

    /// Credit for whatever lies beyond the retained results.
    fn residual(&self, _retained: usize) -> f64 {
        0.0
    }

    fn finish(&self, gap: f64) -> f64;
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct HalfBound {
    maximum: f64,
    fixed: f64,
}

fn half_bound<M: DiscountedMeasure + ?Sized>(
    measure: &M,
    results: &[DocumentResult],
    opponent_len: usize,
) -> HalfBound {
    let mut bound = HalfBound::default();

    for result in results {
        let discount = measure.discount(result.rank);
        match Slot::classify(result, opponent_len) {
            Slot::Judged(grade) => bound.fixed += measure.judged_gain(grade) * discount,
            Slot::Free => bound.maximum += measure.best_gain() * discount,
            Slot::Bound { opponent_rank } if result.rank < opponent_rank => {
                bound.maximum +=
                    measure.best_gain() * (discount - measure.discount(opponent_rank));
            }
            Slot::Bound { .. } => {}
        }
    }

    bound.maximum += measure.residual(results.len());
    bound
}

/// Larger of the two one-sided worst cases: all room on one side taken,
/// less the fixed credit of the other side.
pub(crate) fn discounted_gap<M: DiscountedMeasure + ?Sized>(
    measure: &M,
    left: &[DocumentResult],
    right: &[DocumentResult],
) -> f64 {
    let left = &left[..left.len().min(measure.depth())];
    let right = &right[..right.len().min(measure.depth())];

    let left_bound = half_bound(measure, left, right.len());
    let right_bound = half_bound(measure, right, left.len());

    let left_ahead = left_bound.maximum + left_bound.fixed - right_bound.fixed;
    let right_ahead = right_bound.maximum + right_bound.fixed - left_bound.fixed;

    measure.finish(left_ahead.max(right_ahead))
}
