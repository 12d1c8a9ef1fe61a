pub mod style;
pub mod traits;
pub mod components;
pub mod block;
pub mod table;
pub mod finish;
pub mod renderer;

pub use style::*;
pub use traits::*;
pub use components::*;
pub use block::*;
pub use table::*;
pub use finish::*;
pub use renderer::*;
