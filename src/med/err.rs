use super::measure::{MeasureKind, Maximizer, Slot};
use super::relevance::RelevanceTable;
use crate::cli::ErrSearchMode;
use crate::model::DocumentResult;

/// MED-ERR. The cascade has no closed-form worst case, so up to
/// `promotions` unjudged documents are tried at the maximum grade by a
/// depth-first search over the top `depth` ranks of each run.
#[derive(Debug, Clone)]
pub struct ErrMax {
    table: RelevanceTable,
    depth: usize,
    promotions: usize,
    mode: ErrSearchMode,
}

/// Working copy of one run's retained head.
#[derive(Debug, Clone)]
struct Cascade {
    ranks: Vec<usize>,
    grades: Vec<Option<u8>>,
    /// Index of the same document in the opposing cascade.
    links: Vec<Option<usize>>,
}

impl Cascade {
    fn new(results: &[DocumentResult], opponent_len: usize) -> Self {
        Self {
            ranks: results.iter().map(|result| result.rank).collect(),
            grades: results.iter().map(|result| result.relevance).collect(),
            links: results
                .iter()
                .map(|result| match Slot::classify(result, opponent_len) {
                    Slot::Bound { opponent_rank } => Some(opponent_rank - 1),
                    Slot::Judged(_) | Slot::Free => None,
                })
                .collect(),
        }
    }

    fn len(&self) -> usize {
        self.ranks.len()
    }

    /// ERR with bound unjudged documents at zero and free ones at `free_grade`.
    fn score(&self, table: &RelevanceTable, free_grade: u8) -> f64 {
        let mut survival = 1.0;
        let mut score = 0.0;

        for index in 0..self.len() {
            let probability = match (self.grades[index], self.links[index]) {
                (Some(grade), _) => table.probability(grade),
                (None, Some(_)) => 0.0,
                (None, None) => table.probability(free_grade),
            };
            score += survival * probability / self.ranks[index] as f64;
            survival *= 1.0 - probability;
        }

        score
    }
}

/// One direction of the search: `primary` takes every free document at the
/// maximum grade, `opponent` takes them at zero.
struct Search<'a> {
    table: &'a RelevanceTable,
    mode: ErrSearchMode,
    primary: Cascade,
    opponent: Cascade,
}

impl Search<'_> {
    fn gap(&self) -> f64 {
        let primary = self.primary.score(self.table, self.table.max_grade());
        let opponent = self.opponent.score(self.table, 0);
        (primary - opponent).abs()
    }

    /// Runs `visit` with the document at `index` (and its bound copy) at the
    /// maximum grade, restoring both grades before returning.
    fn with_promoted(&mut self, index: usize, visit: impl FnOnce(&mut Self) -> f64) -> f64 {
        let max_grade = Some(self.table.max_grade());
        let link = self.primary.links[index];
        let saved_primary = self.primary.grades[index];
        let saved_opponent = link.map(|other| self.opponent.grades[other]);

        self.primary.grades[index] = max_grade;
        if let Some(other) = link {
            self.opponent.grades[other] = max_grade;
        }

        let gap = visit(self);

        self.primary.grades[index] = saved_primary;
        if let (Some(other), Some(saved)) = (link, saved_opponent) {
            self.opponent.grades[other] = saved;
        }

        gap
    }

    fn explore(&mut self, budget: usize, start: usize) -> f64 {
        let mut best = self.gap();
        if budget == 0 {
            return best;
        }

        for index in start..self.primary.len() {
            if self.primary.grades[index].is_some() {
                continue;
            }

            let bound = self.primary.links[index].is_some();
            let gap = self.with_promoted(index, |search| search.explore(budget - 1, index + 1));
            best = best.max(gap);

            // A free document already sits at the maximum grade on this side,
            // so deeper promotions on this branch are not explored.
            if !bound && self.mode == ErrSearchMode::Pruned {
                return best;
            }
        }

        best
    }
}

impl ErrMax {
    pub fn new(
        table: RelevanceTable,
        depth: usize,
        promotions: usize,
        mode: ErrSearchMode,
    ) -> Self {
        Self {
            table,
            depth,
            promotions,
            mode,
        }
    }

    fn search<'a>(&'a self, primary: &[DocumentResult], opponent: &[DocumentResult]) -> Search<'a> {
        Search {
            table: &self.table,
            mode: self.mode,
            primary: Cascade::new(primary, opponent.len()),
            opponent: Cascade::new(opponent, primary.len()),
        }
    }

    fn truncate<'r>(&self, results: &'r [DocumentResult]) -> &'r [DocumentResult] {
        &results[..results.len().min(self.depth)]
    }

    /// Gap with no promotions: each side in turn takes its free documents at
    /// the maximum grade while the other takes them at zero.
    #[cfg(test)]
    pub fn baseline(&self, left: &[DocumentResult], right: &[DocumentResult]) -> f64 {
        let (left, right) = (self.truncate(left), self.truncate(right));
        let forward = self.search(left, right).gap();
        let backward = self.search(right, left).gap();
        forward.max(backward)
    }
}

impl Maximizer for ErrMax {
    fn kind(&self) -> MeasureKind {
        MeasureKind::Err
    }

    fn maximize(&self, left: &[DocumentResult], right: &[DocumentResult]) -> f64 {
        let (left, right) = (self.truncate(left), self.truncate(right));
        let forward = self.search(left, right).explore(self.promotions, 0);
        let backward = self.search(right, left).explore(self.promotions, 0);
        forward.max(backward)
    }
}
