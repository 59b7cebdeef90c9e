pub mod arbiter;
pub mod error;
pub mod geom;
pub mod hand;
pub mod sector;
pub mod timer;

pub use error::Error;
