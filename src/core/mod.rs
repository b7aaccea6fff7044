// Core modules implementing the text format, typed access, and error modeling.
pub mod error;
pub mod list;
pub mod section;
pub mod store;
pub mod text;
pub mod trim;
pub mod value;
