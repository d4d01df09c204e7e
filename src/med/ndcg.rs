use super::measure::{DiscountedMeasure, MeasureKind, Maximizer, discounted_gap};
use super::relevance::RelevanceTable;
use crate::model::DocumentResult;

/// MED-nDCG@k: graded gains, log2 discount, normalized by an ideal list of
/// `k` maximally relevant documents.
#[derive(Debug, Clone)]
pub struct NdcgMax {
    table: RelevanceTable,
    depth: usize,
    norm: f64,
}

impl NdcgMax {
    pub fn new(table: RelevanceTable, depth: usize) -> Self {
        let norm = ideal_gain(&table, depth);
        Self { table, depth, norm }
    }
}

pub fn ideal_gain(table: &RelevanceTable, depth: usize) -> f64 {
    (1..=depth)
        .map(|rank| table.max_probability() / log_discount(rank))
        .sum()
}

fn log_discount(rank: usize) -> f64 {
    (rank as f64 + 1.0).log2()
}

impl DiscountedMeasure for NdcgMax {
    fn depth(&self) -> usize {
        self.depth
    }

    fn discount(&self, rank: usize) -> f64 {
        1.0 / log_discount(rank)
    }

    fn judged_gain(&self, grade: u8) -> f64 {
        self.table.probability(grade)
    }

    fn best_gain(&self) -> f64 {
        self.table.max_probability()
    }

    fn finish(&self, gap: f64) -> f64 {
        gap / self.norm
    }
}

impl Maximizer for NdcgMax {
    fn kind(&self) -> MeasureKind {
        MeasureKind::Ndcg
    }

    fn maximize(&self, left: &[DocumentResult], right: &[DocumentResult]) -> f64 {
        discounted_gap(self, left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::med::tests::{assert_close, topic_pair};

    fn reference() -> NdcgMax {
        NdcgMax::new(RelevanceTable::new(2), 20)
    }

    #[test]
    fn ideal_gain_sums_maximal_gain_over_depth() {
        let table = RelevanceTable::new(2);
        assert_close(ideal_gain(&table, 1), 0.75);
        assert_close(ideal_gain(&table, 2), 0.75 + 0.75 / 3f64.log2());
    }

    #[test]
    fn swapped_pair_is_bounded_by_the_promotable_head() {
        let (left, right) = topic_pair(&["x", "y"], &["y", "x"], &[]);
        let ndcg = reference();

        let expected = 0.75 * (1.0 - 1.0 / 3f64.log2()) / ideal_gain(&RelevanceTable::new(2), 20);
        assert_close(ndcg.maximize(&left, &right), expected);
    }

    #[test]
    fn identical_lists_have_no_gap() {
        let (left, right) = topic_pair(&["a", "b", "c"], &["a", "b", "c"], &[("b", 1)]);
        assert_close(reference().maximize(&left, &right), 0.0);
    }

    #[test]
    fn shared_judged_document_at_the_top_has_no_gap() {
        let (left, right) = topic_pair(&["a"], &["a"], &[("a", 2)]);
        assert_close(reference().maximize(&left, &right), 0.0);
    }

    #[test]
    fn disjoint_free_lists_fill_the_whole_head() {
        let docs_left: Vec<String> = (0..20).map(|i| format!("l{i}")).collect();
        let docs_right: Vec<String> = (0..20).map(|i| format!("r{i}")).collect();
        let left_refs: Vec<&str> = docs_left.iter().map(String::as_str).collect();
        let right_refs: Vec<&str> = docs_right.iter().map(String::as_str).collect();
        let (left, right) = topic_pair(&left_refs, &right_refs, &[]);

        assert_close(reference().maximize(&left, &right), 1.0);
    }

    #[test]
    fn judged_relevance_on_one_side_is_credited() {
        let (left, right) = topic_pair(&["x"], &["y"], &[("x", 2), ("y", 0)]);
        let expected = 0.75 / ideal_gain(&RelevanceTable::new(2), 20);
        assert_close(reference().maximize(&left, &right), expected);
    }
}
