mod deepgram;
mod factory;
mod openai;

pub use deepgram::DeepgramProvider;
pub use factory::{ProviderFactory, ProviderKind};
pub use openai::OpenAiProvider;
