pub mod types;
pub mod record;
pub mod source;

pub use types::*;
pub use record::*;
pub use source::*;
