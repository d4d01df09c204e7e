use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "med",
    version,
    about = "Maximized effectiveness difference between two TREC runs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute MED-nDCG, MED-RBP and MED-ERR for every topic shared by two runs.
    Compare(CompareArgs),
    /// Print a normalized run, optionally labelled and cross-referenced.
    Dump(DumpArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    pub run1: PathBuf,

    pub run2: PathBuf,

    #[arg(long)]
    pub qrels: Option<PathBuf>,

    #[command(flatten)]
    pub measure: MeasureArgs,

    #[arg(long)]
    pub threads: Option<usize>,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long)]
    pub report_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct DumpArgs {
    pub run: PathBuf,

    #[arg(long)]
    pub qrels: Option<PathBuf>,

    #[arg(long)]
    pub against: Option<PathBuf>,

    #[command(flatten)]
    pub measure: MeasureArgs,
}

/// Overrides layered on top of the defaults and the optional config file.
#[derive(Args, Debug, Clone, Default)]
pub struct MeasureArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub max_grade: Option<u8>,

    #[arg(long)]
    pub depth: Option<usize>,

    #[arg(long)]
    pub ndcg_depth: Option<usize>,

    #[arg(long)]
    pub rbp_depth: Option<usize>,

    #[arg(long)]
    pub err_depth: Option<usize>,

    #[arg(long)]
    pub persistence: Option<f64>,

    #[arg(long)]
    pub err_promotions: Option<usize>,

    #[arg(long, value_enum)]
    pub err_search: Option<ErrSearchMode>,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrSearchMode {
    #[default]
    Pruned,
    Exhaustive,
}

impl ErrSearchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pruned => "pruned",
            Self::Exhaustive => "exhaustive",
        }
    }
}
