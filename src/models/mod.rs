pub mod answer_key;
pub mod loaders;
pub mod question;

pub use answer_key::AnswerKey;
pub use loaders::{list_documents, load_answer_key, load_document, Document};
pub use question::{ExtractedQuestion, QuestionRecord, StoredQuestion};
