pub mod answer;
pub mod config;
pub mod huggingface;
pub mod index;
pub mod llm;
pub mod retrieve;
pub mod session;
