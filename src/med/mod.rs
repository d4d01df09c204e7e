//! Per-topic maximization engine.
//!
//! Inputs are two runs whose results already carry judged grades and
//! opponent ranks; every function here is pure apart from the ERR search,
//! which works on its own copy of a topic's head.

mod aggregate;
mod err;
mod measure;
mod merge;
mod ndcg;
mod rbp;
mod relevance;

pub use aggregate::{MeasureSuite, aggregate};
pub use merge::{cross_reference, label_judgments, sort_by_topic_and_doc, sort_by_topic_and_rank};
