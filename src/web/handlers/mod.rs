pub mod analyze;
pub mod rewrite;
