mod ids;
mod project;
mod report;

pub use ids::*;
pub use project::*;
pub use report::*;
