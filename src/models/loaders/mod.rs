pub mod pdf_loader;

pub use pdf_loader::{load_all_pdf_files, load_pdf_document, UploadLimits};
