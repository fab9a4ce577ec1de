mod service;
mod types;

pub use service::Generator;
pub use types::*;
