pub mod memory_crud;
pub mod version_ops;
