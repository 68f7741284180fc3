pub mod category;
pub mod ingredient;
pub mod recipe;
pub mod tag;

pub use category::*;
pub use ingredient::*;
pub use recipe::*;
pub use tag::*;
