//! Text processing module
//!
//! HTML content extraction and tokenization of the extracted text.

mod extract;
mod stopwords;
mod tokens;

pub use extract::{extract_page, ExtractError, ExtractedPage};
pub use stopwords::DEFAULT_STOPWORDS;
pub use tokens::Tokenizer;
