pub mod error;
pub mod tolerance;
pub mod traits;

pub use error::{HewError, Result};
pub use tolerance::Tolerance;
