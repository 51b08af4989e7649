#[cfg(test)]
pub mod mock;
mod project_backend;

pub use project_backend::*;
