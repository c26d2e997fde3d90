pub mod analyzer;
pub mod decision_engine;
pub mod report_writer;
pub mod rules;

pub use analyzer::{build_analyzer, AssessmentAnalyzer, DelegatedAnalyzer, LocalRuleAnalyzer};
pub use decision_engine::{determine_decision, extract_caveats};
pub use report_writer::ReportWriter;
