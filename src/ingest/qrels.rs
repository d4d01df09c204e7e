use std::path::Path;

use anyhow::{Result, bail};
use tracing::info;

use super::{parse_natural, read_lines};
use crate::model::Judgment;

/// Loads TREC qrels: `topic iteration docno grade`, clamping grades to
/// `max_grade`. Returned sorted by (topic, docno).
pub fn load_qrels(path: &Path, max_grade: u8) -> Result<Vec<Judgment>> {
    let lines = read_lines(path, "qrels")?;
    let mut judgments = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().take(4).collect();
        let parsed = match fields.as_slice() {
            [topic, _, doc_id, grade] => parse_natural(topic)
                .zip(parse_natural(grade))
                .map(|(topic, grade)| (topic, *doc_id, grade)),
            _ => None,
        };
        let Some((topic, doc_id, grade)) = parsed else {
            bail!(
                "syntax error in qrels file \"{}\" at line {}",
                path.display(),
                index + 1
            );
        };

        judgments.push(Judgment {
            topic,
            doc_id: doc_id.to_string(),
            grade: grade.min(u32::from(max_grade)) as u8,
        });
    }

    judgments.sort_by(|a, b| a.topic.cmp(&b.topic).then_with(|| a.doc_id.cmp(&b.doc_id)));

    if let Some(pair) = judgments
        .windows(2)
        .find(|pair| pair[0].topic == pair[1].topic && pair[0].doc_id == pair[1].doc_id)
    {
        bail!(
            "duplicate docno ({}) for topic {} in qrels file \"{}\"",
            pair[1].doc_id,
            pair[1].topic,
            path.display()
        );
    }

    info!(
        path = %path.display(),
        judgments = judgments.len(),
        relevant = judgments.iter().filter(|judgment| judgment.grade > 0).count(),
        "loaded qrels"
    );
    Ok(judgments)
}
