pub mod embedder;
pub mod entry_id;
pub mod question_cache;
pub mod question_generator;
pub mod question_index_service;
