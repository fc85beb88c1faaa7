pub mod pinecone_index;
pub mod vector_index;

pub use pinecone_index::PineconeVectorIndex;
pub use vector_index::{InMemoryVectorIndex, VectorIndex};
