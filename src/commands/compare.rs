use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::output::{write_csv_report, write_json_report};
use crate::cli::CompareArgs;
use crate::config::MedConfig;
use crate::ingest::{load_qrels, load_run};
use crate::med::{MeasureSuite, aggregate, cross_reference, label_judgments, sort_by_topic_and_rank};
use crate::model::{Aggregate, ComparisonManifest, ComparisonReport, InputFingerprint, Run};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

pub fn run(args: CompareArgs) -> Result<()> {
    let config = MedConfig::resolve(&args.measure)?;
    info!(
        max_grade = config.max_grade,
        depth = config.depth,
        ndcg_depth = config.ndcg_depth,
        rbp_depth = config.rbp_depth,
        err_depth = config.err_depth,
        persistence = config.persistence,
        err_promotions = config.err_promotions,
        err_search = config.err_search.as_str(),
        "resolved measure configuration"
    );

    let mut left = load_run(&args.run1, config.depth)?;
    let mut right = load_run(&args.run2, config.depth)?;

    let aggregate = if left.results.is_empty() || right.results.is_empty() {
        warn!("at least one run is empty; reporting zero differences");
        Aggregate::default()
    } else {
        if let Some(qrels_path) = &args.qrels {
            let judgments = load_qrels(qrels_path, config.max_grade)?;
            let left_labelled = label_judgments(&mut left.results, &judgments);
            let right_labelled = label_judgments(&mut right.results, &judgments);
            info!(left_labelled, right_labelled, "applied relevance judgments");
        }

        let shared = cross_reference(&mut left.results, &mut right.results);
        sort_by_topic_and_rank(&mut left.results);
        sort_by_topic_and_rank(&mut right.results);
        info!(shared, "cross-referenced runs");

        let suite = MeasureSuite::from_config(&config);
        match args.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("failed to build topic worker pool")?
                .install(|| aggregate(&suite, &left.results, &right.results)),
            None => aggregate(&suite, &left.results, &right.results),
        }
    };

    info!(
        scored = aggregate.mean.topics,
        skipped_first_only = aggregate.skipped_left_only,
        skipped_second_only = aggregate.skipped_right_only,
        "topic aggregation complete"
    );

    let report = build_report(&left, &right, &config, &aggregate);
    if args.json {
        write_json_report(&report)?;
    } else {
        write_csv_report(&report)?;
    }

    if let Some(report_path) = &args.report_path {
        let manifest = build_manifest(&args, config, &aggregate, report)?;
        write_json_pretty(report_path, &manifest)?;
        info!(path = %report_path.display(), "wrote comparison manifest");
    }

    Ok(())
}

fn build_report(
    left: &Run,
    right: &Run,
    config: &MedConfig,
    aggregate: &Aggregate,
) -> ComparisonReport {
    ComparisonReport {
        run1: left.run_id.clone(),
        run2: right.run_id.clone(),
        ndcg_depth: config.ndcg_depth,
        topics: aggregate.topics.clone(),
        mean: aggregate.mean,
    }
}

fn build_manifest(
    args: &CompareArgs,
    config: MedConfig,
    aggregate: &Aggregate,
    report: ComparisonReport,
) -> Result<ComparisonManifest> {
    let mut inputs = vec![
        fingerprint("run1", &args.run1)?,
        fingerprint("run2", &args.run2)?,
    ];
    if let Some(qrels) = &args.qrels {
        inputs.push(fingerprint("qrels", qrels)?);
    }
    if let Some(config_path) = &args.measure.config {
        inputs.push(fingerprint("config", config_path)?);
    }

    Ok(ComparisonManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        config,
        inputs,
        skipped_left_only: aggregate.skipped_left_only,
        skipped_right_only: aggregate.skipped_right_only,
        report,
    })
}

fn fingerprint(role: &str, path: &Path) -> Result<InputFingerprint> {
    Ok(InputFingerprint {
        role: role.to_string(),
        path: path.display().to_string(),
        sha256: sha256_file(path)?,
    })
}
