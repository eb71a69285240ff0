//! Document store backends.

pub mod memory;

pub use memory::MemoryDocumentStore;
