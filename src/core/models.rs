pub mod comment;
pub mod common;
pub mod membership;
pub mod mention;
pub mod organization;
pub mod photo;
pub mod post;
pub mod profile;
pub mod reaction;
pub mod social;
