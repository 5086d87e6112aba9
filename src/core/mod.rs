pub mod chains;
pub mod intent;
pub mod parser;
pub mod recent;
pub mod store;
pub mod suggest;
pub mod types;
pub mod validate;
