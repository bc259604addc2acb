pub mod backup;
pub mod template;
