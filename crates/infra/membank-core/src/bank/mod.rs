pub mod store;
pub mod template;

pub use store::{
    BankState, CopyOutcome, append_section, copy_all, document_path, documents, initialize,
    read_document, state, write_document,
};
pub use template::{Document, DocumentTemplate, Section};
