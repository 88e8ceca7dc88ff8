pub mod llm;
pub mod prompts;
