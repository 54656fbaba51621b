pub mod authorizer;
#[cfg(test)]
pub mod memory;
pub mod repository;
pub mod tokener;
