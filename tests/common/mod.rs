pub mod builders;
pub mod strategies;

pub use builders::*;
pub use strategies::*;
