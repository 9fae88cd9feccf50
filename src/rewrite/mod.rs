// Text rewriting — trait-based abstraction over a generative text provider.
//
// The Rewriter trait defines the interface. ChatRewriter implements it against
// an OpenAI-compatible chat-completions API; NoopRewriter stands in when no
// provider is configured.

pub mod chat;
pub mod rate_limiter;
pub mod traits;

pub use traits::{NoopRewriter, RewriteConstraints, RewriteRequest, Rewriter};
