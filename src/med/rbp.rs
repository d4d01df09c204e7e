use super::measure::{DiscountedMeasure, MeasureKind, Maximizer, discounted_gap};
use crate::model::DocumentResult;

/// MED-RBP with binary relevance (any positive grade counts as relevant).
#[derive(Debug, Clone)]
pub struct RbpMax {
    persistence: f64,
    depth: usize,
}

impl RbpMax {
    pub fn new(persistence: f64, depth: usize) -> Self {
        Self { persistence, depth }
    }
}

impl DiscountedMeasure for RbpMax {
    fn depth(&self) -> usize {
        self.depth
    }

    fn discount(&self, rank: usize) -> f64 {
        self.persistence.powi(rank as i32 - 1)
    }

    fn judged_gain(&self, grade: u8) -> f64 {
        if grade > 0 { 1.0 } else { 0.0 }
    }

    fn best_gain(&self) -> f64 {
        1.0
    }

    // Everything past the retained results is unknown and may be relevant.
    fn residual(&self, retained: usize) -> f64 {
        self.persistence.powi(retained as i32) / (1.0 - self.persistence)
    }

    fn finish(&self, gap: f64) -> f64 {
        (1.0 - self.persistence) * gap
    }
}

impl Maximizer for RbpMax {
    fn kind(&self) -> MeasureKind {
        MeasureKind::Rbp
    }

    fn maximize(&self, left: &[DocumentResult], right: &[DocumentResult]) -> f64 {
        discounted_gap(self, left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::med::tests::{assert_close, topic_pair};

    const PSI: f64 = 0.95;

    fn reference() -> RbpMax {
        RbpMax::new(PSI, 1000)
    }

    #[test]
    fn identical_lists_leave_only_the_residual() {
        let (left, right) = topic_pair(&["x", "y"], &["x", "y"], &[]);
        assert_close(reference().maximize(&left, &right), PSI.powi(2));
    }

    #[test]
    fn swapped_pair_gains_one_discount_step() {
        let (left, right) = topic_pair(&["x", "y"], &["y", "x"], &[]);
        let expected = (1.0 - PSI) * ((1.0 - PSI) + PSI.powi(2) / (1.0 - PSI));
        assert_close(reference().maximize(&left, &right), expected);
    }

    #[test]
    fn shared_judged_document_cancels_out() {
        let (left, right) = topic_pair(&["a"], &["a"], &[("a", 2)]);
        assert_close(reference().maximize(&left, &right), PSI);
    }

    #[test]
    fn free_single_documents_reach_the_full_scale() {
        let (left, right) = topic_pair(&["x"], &["y"], &[]);
        assert_close(reference().maximize(&left, &right), 1.0);
    }

    #[test]
    fn non_relevant_judgments_earn_nothing() {
        let (left, right) = topic_pair(&["x"], &["y"], &[("x", 0), ("y", 1)]);
        // right: fixed 1 plus residual; left: residual only
        let residual = PSI / (1.0 - PSI);
        assert_close(
            reference().maximize(&left, &right),
            (1.0 - PSI) * (residual + 1.0),
        );
    }

    #[test]
    fn depth_truncates_before_the_residual() {
        let rbp = RbpMax::new(0.5, 1);
        let (left, right) = topic_pair(&["x", "y"], &["x", "y"], &[]);
        // Only rank 1 is retained on both sides, so the residual starts at 0.5^1.
        assert_close(rbp.maximize(&left, &right), 0.5 * (0.5 / 0.5));
    }
}
