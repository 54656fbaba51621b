pub mod comment;
pub mod mention;
pub mod organization;
pub mod photo;
pub mod post;
pub mod profile;
pub mod reaction;
pub mod team;

use actix_web::web::Data;

use crate::database::sqlx::PgSqlxManager;
use crate::impls::authorizer::casbin::CasbinAuthorizer;

pub type DB = Data<PgSqlxManager>;
pub type Auth = Data<CasbinAuthorizer>;
