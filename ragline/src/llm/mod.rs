mod api;
mod generator;
pub mod prompts;

pub use api::LlmApiClient;
pub use generator::AnswerGenerator;
