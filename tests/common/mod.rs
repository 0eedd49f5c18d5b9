pub mod builders;
pub mod harness;

// Re-export commonly used test utilities
#[allow(unused_imports)]
pub use builders::CorpusBuilder;
#[allow(unused_imports)]
pub use harness::{fixed_service, TestHarness};
