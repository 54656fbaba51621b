mod config;
mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middlewares;
pub mod request;
pub mod response;

use actix_web::web::{delete, get, post, put, scope, Data};
use actix_web::HttpServer;
use sqlx::postgres::PgPoolOptions;

use config::Config;
use database::sqlx::PgSqlxManager;
use error::Error;
use impls::authorizer::casbin::CasbinAuthorizer;
use middlewares::jwt::JWTMiddleware;

#[actix_web::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let config = Config::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    let manager = Data::new(PgSqlxManager::new(pool));
    let authorizer = Data::new(CasbinAuthorizer::new().await?);
    let secret = config.jwt_secret.into_bytes();
    log::info!("listening on {}:{}", config.bind_host, config.bind_port);
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(manager.clone())
            .app_data(authorizer.clone())
            .service(
                scope("")
                    .wrap(JWTMiddleware::new(secret.clone()))
                    .route("mentions", get().to(handlers::mention::search))
                    .route("me/bookmarks", get().to(handlers::profile::bookmarks))
                    .service(
                        scope("profiles")
                            .route("", get().to(handlers::profile::explore))
                            .route("me", get().to(handlers::profile::me))
                            .route("me", put().to(handlers::profile::update_me))
                            .route("me/posts", post().to(handlers::post::create_personal))
                            .service(
                                scope("{profile_id}")
                                    .route("", get().to(handlers::profile::detail))
                                    .route("followers", get().to(handlers::profile::followers))
                                    .route("following", get().to(handlers::profile::following))
                                    .route("following/organizations", get().to(handlers::profile::following_organizations))
                                    .route("follow", post().to(handlers::profile::toggle_follow))
                                    .route("follow", put().to(handlers::profile::follow))
                                    .route("follow", delete().to(handlers::profile::unfollow))
                                    .route("posts", get().to(handlers::post::profile_posts)),
                            ),
                    )
                    .service(
                        scope("organizations")
                            .route("", post().to(handlers::organization::create))
                            .route("slug/{slug}", get().to(handlers::organization::detail_by_slug))
                            .service(
                                scope("{organization_id}")
                                    .route("", get().to(handlers::organization::detail))
                                    .route("", put().to(handlers::organization::update))
                                    .route("", delete().to(handlers::organization::delete_organization))
                                    .route("mission", put().to(handlers::organization::update_mission))
                                    .route("impact", get().to(handlers::organization::impact))
                                    .route("impact", put().to(handlers::organization::put_impact))
                                    .route("north_star", get().to(handlers::organization::north_star))
                                    .route("north_star", put().to(handlers::organization::put_north_star))
                                    .route("followers", get().to(handlers::organization::followers))
                                    .route("follow", post().to(handlers::organization::toggle_follow))
                                    .route("follow", put().to(handlers::organization::follow))
                                    .route("follow", delete().to(handlers::organization::unfollow))
                                    .route("bookmark", post().to(handlers::organization::toggle_bookmark))
                                    .route("posts", get().to(handlers::post::organization_posts))
                                    .route("posts", post().to(handlers::post::create_organization_post))
                                    .service(
                                        scope("photos")
                                            .route("", get().to(handlers::photo::list))
                                            .route("", post().to(handlers::photo::add))
                                            .route("order", put().to(handlers::photo::reorder))
                                            .route("{photo_id}", put().to(handlers::photo::update))
                                            .route("{photo_id}", delete().to(handlers::photo::delete)),
                                    )
                                    .route("team", get().to(handlers::team::groups))
                                    .service(
                                        scope("members")
                                            .route("", get().to(handlers::team::members))
                                            .route("", post().to(handlers::team::add))
                                            .route("{profile_id}", delete().to(handlers::team::remove))
                                            .route("{profile_id}/role", put().to(handlers::team::change_role))
                                            .route("{profile_id}/visibility", put().to(handlers::team::set_visibility)),
                                    ),
                            ),
                    )
                    .service(
                        scope("posts/{scope}/{post_id}")
                            .route("", get().to(handlers::post::detail))
                            .route("", put().to(handlers::post::update))
                            .route("", delete().to(handlers::post::delete))
                            .route("comments", get().to(handlers::comment::list))
                            .route("comments", post().to(handlers::comment::add))
                            .route("reactions", get().to(handlers::reaction::post_state))
                            .route("reactions", put().to(handlers::reaction::react_post))
                            .route("reactions", delete().to(handlers::reaction::unreact_post))
                            .route("reactions/users", get().to(handlers::reaction::post_reactors)),
                    )
                    .service(
                        scope("comments/{scope}/{comment_id}")
                            .route("", put().to(handlers::comment::edit))
                            .route("", delete().to(handlers::comment::delete))
                            .route("reactions", get().to(handlers::reaction::comment_state))
                            .route("reactions", put().to(handlers::reaction::react_comment))
                            .route("reactions", delete().to(handlers::reaction::unreact_comment))
                            .route("reactions/users", get().to(handlers::reaction::comment_reactors)),
                    ),
            )
    })
    .bind((config.bind_host, config.bind_port))?
    .run()
    .await?;
    Ok(())
}
