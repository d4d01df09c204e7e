use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use super::{parse_natural, read_lines};
use crate::med::sort_by_topic_and_doc;
use crate::model::{DocumentResult, Run};

/// Loads a TREC run: `topic Q0 docno rank score runid`.
///
/// Ranks are reassigned in traditional order and only the top `depth`
/// results per topic are kept. The returned results are sorted by
/// (topic, docno).
pub fn load_run(path: &Path, depth: usize) -> Result<Run> {
    let lines = read_lines(path, "run")?;
    let mut run_id = None;
    let mut results = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().take(6).collect();
        let parsed = match fields.as_slice() {
            [topic, _, doc_id, rank, score, line_run_id] => parse_natural(topic)
                .zip(parse_natural(rank))
                .zip(score.parse::<f64>().ok())
                .map(|((topic, _), score)| (topic, *doc_id, score, *line_run_id)),
            _ => None,
        };
        let Some((topic, doc_id, score, line_run_id)) = parsed else {
            bail!(
                "syntax error in run file \"{}\" at line {}",
                path.display(),
                index + 1
            );
        };

        run_id.get_or_insert_with(|| line_run_id.to_string());
        results.push(DocumentResult::new(topic, doc_id, 0, score));
    }

    let run_id = run_id.context("run file has no results")?;

    force_traditional_ranks(&mut results);
    apply_cutoff(&mut results, depth);
    sort_by_topic_and_doc(&mut results);
    ensure_unique_docnos(&results, path)?;

    let run = Run { run_id, results };
    info!(
        path = %path.display(),
        run_id = %run.run_id,
        results = run.results.len(),
        topics = run.topic_count(),
        "loaded run"
    );
    Ok(run)
}

/// Sorts by topic, then score descending, then docno descending, and numbers
/// each topic's results from 1. Ranks given in the file are ignored.
pub(super) fn force_traditional_ranks(results: &mut [DocumentResult]) {
    results.sort_by(|a, b| {
        a.topic
            .cmp(&b.topic)
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| b.doc_id.cmp(&a.doc_id))
    });

    for slice in results.chunk_by_mut(|left, right| left.topic == right.topic) {
        for (index, result) in slice.iter_mut().enumerate() {
            result.rank = index + 1;
        }
    }
}

/// Drops results ranked below `depth`. Ranks must already be contiguous.
pub(super) fn apply_cutoff(results: &mut Vec<DocumentResult>, depth: usize) {
    results.retain(|result| result.rank <= depth);
}

fn ensure_unique_docnos(results: &[DocumentResult], path: &Path) -> Result<()> {
    if let Some(pair) = results
        .windows(2)
        .find(|pair| pair[0].topic == pair[1].topic && pair[0].doc_id == pair[1].doc_id)
    {
        bail!(
            "duplicate docno ({}) for topic {} in run file \"{}\"",
            pair[1].doc_id,
            pair[1].topic,
            path.display()
        );
    }
    Ok(())
}
