use std::io::{self, Write};

use anyhow::Result;
use tracing::info;

use crate::cli::DumpArgs;
use crate::config::MedConfig;
use crate::ingest::{load_qrels, load_run};
use crate::med::{cross_reference, label_judgments, sort_by_topic_and_rank};
use crate::model::Run;

pub fn run(args: DumpArgs) -> Result<()> {
    let config = MedConfig::resolve(&args.measure)?;
    let mut run = load_run(&args.run, config.depth)?;

    if let Some(qrels_path) = &args.qrels {
        let judgments = load_qrels(qrels_path, config.max_grade)?;
        let labelled = label_judgments(&mut run.results, &judgments);
        info!(labelled, "applied relevance judgments");
    }

    if let Some(against_path) = &args.against {
        let mut against = load_run(against_path, config.depth)?;
        let shared = cross_reference(&mut run.results, &mut against.results);
        info!(shared, against = %against.run_id, "cross-referenced runs");
    }

    sort_by_topic_and_rank(&mut run.results);

    let mut output = io::BufWriter::new(io::stdout().lock());
    render_run(&run, &mut output)?;
    output.flush()?;
    Ok(())
}

fn render_run(run: &Run, output: &mut impl Write) -> Result<()> {
    for result in &run.results {
        let opponent_rank = result
            .opponent_rank
            .map_or_else(|| "-".to_string(), |rank| rank.to_string());
        let grade = result
            .relevance
            .map_or_else(|| "-".to_string(), |grade| grade.to_string());

        writeln!(
            output,
            "{} {} {} {} {} {}",
            run.run_id, result.topic, result.rank, opponent_rank, grade, result.doc_id
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentResult;

    #[test]
    fn render_run_marks_absent_fields_with_dashes() {
        let mut judged = DocumentResult::new(5, "doc-a", 1, 2.0);
        judged.relevance = Some(1);
        judged.opponent_rank = Some(3);
        let run = Run {
            run_id: "sysA".to_string(),
            results: vec![judged, DocumentResult::new(5, "doc-b", 2, 1.0)],
        };

        let mut buffer = Vec::new();
        render_run(&run, &mut buffer).expect("render run");

        assert_eq!(
            String::from_utf8(buffer).expect("utf8"),
            "sysA 5 1 3 1 doc-a\nsysA 5 2 - - doc-b\n"
        );
    }
}
