/// Probability that a document of a given grade satisfies the user:
/// `rp[g] = (2^g - 1) / 2^G`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceTable {
    probabilities: Vec<f64>,
}

impl RelevanceTable {
    pub fn new(max_grade: u8) -> Self {
        let scale = 2.0_f64.powi(i32::from(max_grade));
        let probabilities = (0..=max_grade)
            .map(|grade| (2.0_f64.powi(i32::from(grade)) - 1.0) / scale)
            .collect();

        Self { probabilities }
    }

    pub fn max_grade(&self) -> u8 {
        (self.probabilities.len() - 1) as u8
    }

    /// Grades above the maximum are treated as the maximum.
    pub fn probability(&self, grade: u8) -> f64 {
        let index = usize::from(grade).min(self.probabilities.len() - 1);
        self.probabilities[index]
    }

    pub fn max_probability(&self) -> f64 {
        self.probability(self.max_grade())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_grades_map_to_err_gain_probabilities() {
        let table = RelevanceTable::new(2);
        assert_eq!(table.max_grade(), 2);
        assert_eq!(table.probability(0), 0.0);
        assert_eq!(table.probability(1), 0.25);
        assert_eq!(table.probability(2), 0.75);
        assert_eq!(table.max_probability(), 0.75);
    }

    #[test]
    fn binary_scale_uses_one_half_for_relevant() {
        let table = RelevanceTable::new(1);
        assert_eq!(table.probability(1), 0.5);
        assert_eq!(table.probability(7), 0.5);
    }
}
