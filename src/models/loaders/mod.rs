mod answer_key_loader;
mod document_loader;
mod json_loader;
mod text_loader;

pub use answer_key_loader::{load_answer_key, parse_answer_key_toml};
pub use document_loader::{list_documents, load_document, Document};
pub use json_loader::{parse_json_source, JsonSource};
pub use text_loader::{load_text_lines, split_paragraphs};
