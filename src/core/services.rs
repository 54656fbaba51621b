pub mod comment;
pub mod mention;
pub mod organization;
pub mod permission;
pub mod photo;
pub mod post;
pub mod profile;
pub mod reaction;
pub mod social;
pub mod team;
