pub mod gemini;
pub mod mistral;
pub mod traits;

pub use gemini::GeminiProvider;
pub use mistral::MistralProvider;
pub use traits::{ChatMessage, ChatProvider, ProviderError, Role};
