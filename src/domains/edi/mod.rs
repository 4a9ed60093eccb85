//! Facturación electrónica DIAN: document assembly, response handling and
//! the submission workflow.

pub mod amounts;
pub mod assembler;
pub mod attached_document;
pub mod notifications;
pub mod qr;
pub mod response_writer;
pub mod words;
pub mod workflow;

#[cfg(test)]
pub(crate) mod fixtures;

pub use amounts::InvoiceAmounts;
pub use assembler::{assemble, DocumentRequest};
pub use notifications::{Notice, NoticeLevel, Notices};
pub use qr::{QrConfig, QrRenderer};
pub use response_writer::ResponseWriter;
pub use workflow::{BatchFailure, BatchOutcome, InvoiceWorkflow, Processed};
