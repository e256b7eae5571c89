pub mod retriever;
pub mod store;

pub use retriever::*;
pub use store::*;
