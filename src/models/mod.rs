pub mod api;
pub mod catalog;
pub mod invoice;
pub mod partner;
pub mod resolution;

// Re-export commonly used types
pub use api::{
    DocumentLog, DocumentResponse, EnvironmentPayload, EnvironmentStatus, RemoteResolution, ResolutionAck,
    ResolutionPayload,
};
pub use catalog::{EdiDocumentKind, Environment, PaymentForm};
pub use invoice::{
    Currency, EdiFields, EdiTax, Invoice, InvoiceLine, InvoiceState, JournalResolutions, MoveType,
    OriginInvoice, Product, Tax, TaxAmountType,
};
pub use partner::{AddressKind, IdentificationDocument, Partner};
pub use resolution::{Resolution, ResolutionInput, ResolutionPatch};
