pub mod kpi;
pub mod report;
pub mod transcript;

pub use kpi::*;
pub use report::*;
pub use transcript::*;
