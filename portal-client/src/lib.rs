mod client;
pub mod domain;
mod portal_url;

pub use client::*;
pub use domain::*;
pub use portal_url::*;
