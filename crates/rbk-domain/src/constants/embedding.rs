//! Embedding dimension constants.

/// System-wide default embedding dimension (Gemini-class models).
pub const EMBEDDING_DIMENSION_DEFAULT: usize = 768;
/// Ollama nomic-embed-text dimension.
pub const EMBEDDING_DIMENSION_OLLAMA_NOMIC: usize = 768;
/// `OpenAI` text-embedding-3-small dimension.
pub const EMBEDDING_DIMENSION_OPENAI_SMALL: usize = 1536;
/// MiniLM-L6 dimension, used by the deterministic fallback embedder.
pub const EMBEDDING_DIMENSION_MINILM: usize = 384;
