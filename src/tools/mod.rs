pub mod load_docs;
pub mod module_docs;
pub mod search;

pub use load_docs::*;
pub use module_docs::*;
pub use search::*;
