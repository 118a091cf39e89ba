pub mod enums;
pub mod order;

pub use enums::*;
pub use order::*;
