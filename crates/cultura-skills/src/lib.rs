//! Network implementations of the cultura-core service seams.

mod bhashini;
mod model_router;
mod public_lookup;
mod retry;

pub use bhashini::BhashiniClient;
pub use model_router::{LlmMode, ModelRouter};
pub use public_lookup::MyMemoryLookup;
pub use retry::{send_with_retry, RetryPolicy};
