// keygap: keyword importance, similarity and gap analysis for competing texts
//
// This is the library root. The analysis engine is pure and synchronous; the
// rewrite provider, terminal/markdown output and web server sit around it.

pub mod analysis;
pub mod config;
pub mod output;
pub mod rewrite;

#[cfg(feature = "web")]
pub mod web;
