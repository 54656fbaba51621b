pub mod authorizer;
pub mod tokener;
