pub mod gemini;
pub mod groq;
pub mod heuristic;
pub mod ollama;
pub mod prompts;
pub mod provider;
