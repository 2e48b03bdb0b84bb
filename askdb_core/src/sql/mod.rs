pub mod extract;
pub mod types;
pub mod validate;
