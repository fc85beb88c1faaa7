pub mod cache_entry;
pub mod generation_outcome;
pub mod generation_request;
pub mod question;
pub use cache_entry::{CacheEntry, EmbeddingVector, EntryMetadata, IndexMatch, IndexRecord};
pub use generation_outcome::{GenerationOutcome, QuestionOrigin};
pub use generation_request::GenerationRequest;
pub use question::Question;
