mod monitoring;

pub use monitoring::*;
