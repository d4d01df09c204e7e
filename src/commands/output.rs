use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::model::ComparisonReport;

pub fn write_csv_report(report: &ComparisonReport) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    render_csv(report, &mut output)?;
    output.flush()?;
    Ok(())
}

pub fn write_json_report(report: &ComparisonReport) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, report)
        .context("failed to serialize comparison json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn render_csv(report: &ComparisonReport, output: &mut impl Write) -> Result<()> {
    writeln!(
        output,
        "run1,run2,topic,MED-nDCG@{},MED-RBP,MED-ERR",
        report.ndcg_depth
    )?;

    for scores in &report.topics {
        writeln!(
            output,
            "{},{},{},{:.5},{:.5},{:.5}",
            report.run1, report.run2, scores.topic, scores.ndcg, scores.rbp, scores.err
        )?;
    }

    writeln!(
        output,
        "{},{},amean,{:.5},{:.5},{:.5}",
        report.run1, report.run2, report.mean.ndcg, report.mean.rbp, report.mean.err
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MeanScores, TopicScores};

    fn report(topics: Vec<TopicScores>, mean: MeanScores) -> ComparisonReport {
        ComparisonReport {
            run1: "sysA".to_string(),
            run2: "sysB".to_string(),
            ndcg_depth: 20,
            topics,
            mean,
        }
    }

    #[test]
    fn csv_lists_topics_then_the_mean_row() {
        let topics = vec![
            TopicScores {
                topic: 401,
                ndcg: 0.5,
                rbp: 0.25,
                err: 0.125,
            },
            TopicScores {
                topic: 402,
                ndcg: 0.0,
                rbp: 1.0,
                err: 0.333333,
            },
        ];
        let mean = MeanScores {
            topics: 2,
            ndcg: 0.25,
            rbp: 0.625,
            err: 0.229167,
        };

        let mut buffer = Vec::new();
        render_csv(&report(topics, mean), &mut buffer).expect("render csv");
        let text = String::from_utf8(buffer).expect("utf8");

        assert_eq!(
            text,
            "run1,run2,topic,MED-nDCG@20,MED-RBP,MED-ERR\n\
             sysA,sysB,401,0.50000,0.25000,0.12500\n\
             sysA,sysB,402,0.00000,1.00000,0.33333\n\
             sysA,sysB,amean,0.25000,0.62500,0.22917\n"
        );
    }

    #[test]
    fn csv_without_shared_topics_reports_a_zero_mean() {
        let mut buffer = Vec::new();
        render_csv(&report(Vec::new(), MeanScores::default()), &mut buffer).expect("render csv");
        let text = String::from_utf8(buffer).expect("utf8");

        assert!(text.ends_with("sysA,sysB,amean,0.00000,0.00000,0.00000\n"));
        assert_eq!(text.lines().count(), 2);
    }
}
