pub mod fetch;
pub mod migrate;
