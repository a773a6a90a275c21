pub mod model;
pub mod store;

pub use anyhow::anyhow;
pub use anyhow::Error;
pub use anyhow::Result;
