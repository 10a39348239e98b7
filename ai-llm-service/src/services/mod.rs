pub mod hf_qa_service;
pub mod ollama_service;
pub mod open_ai_service;
