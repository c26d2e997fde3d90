pub mod assessment;
pub mod batch;
pub mod decision;
pub mod document;
pub mod loaders;

pub use assessment::{Assessment, Criterion, CriterionVerdict, Measurement};
pub use batch::{BatchResult, BatchState, BatchSummary, Outcome, ProgressState};
pub use decision::Decision;
pub use document::{Credential, Document};
pub use loaders::{load_all_pdf_files, load_pdf_document, UploadLimits};
