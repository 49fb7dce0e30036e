//! Route configuration
//!
//! Centralized route setup; each domain manages its own scope.

use crate::handlers;
use crate::middleware::JwtAuth;
use actix_web::web;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health::health_check))
            .configure(routes::users::configure)
            .configure(routes::tweets::configure)
            .configure(routes::comments::configure)
            .configure(routes::videos::configure)
            .configure(routes::likes::configure)
            .configure(routes::subscriptions::configure)
            .configure(routes::playlists::configure)
            .configure(routes::dashboard::configure),
    );
}

// Sub-modules for each domain
mod routes {
    use super::*;

    pub mod users {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/users")
                    .route("/register", web::post().to(handlers::auth::register))
                    .route("/login", web::post().to(handlers::auth::login))
                    .route("/refreshtoken", web::post().to(handlers::auth::refresh_token))
                    .route(
                        "/profile/{username}",
                        web::get().to(handlers::users::get_channel_profile),
                    )
                    .service(
                        web::scope("")
                            .wrap(JwtAuth)
                            .route("", web::get().to(handlers::users::get_current_user))
                            .route("/logout", web::post().to(handlers::auth::logout))
                            .route("/history", web::get().to(handlers::users::get_watch_history))
                            .route(
                                "/update/password",
                                web::post().to(handlers::users::change_password),
                            )
                            .route(
                                "/update/details",
                                web::patch().to(handlers::users::update_account),
                            )
                            .route(
                                "/update/avatar",
                                web::patch().to(handlers::users::update_avatar),
                            )
                            .route(
                                "/update/coverImage",
                                web::patch().to(handlers::users::update_cover_image),
                            ),
                    ),
            );
        }
    }

    pub mod tweets {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/tweets")
                    .route("/user/{username}", web::get().to(handlers::tweets::get_user_tweets))
                    .service(
                        web::scope("")
                            .wrap(JwtAuth)
                            .route("", web::post().to(handlers::tweets::create_tweet))
                            .route("/{tweetId}", web::patch().to(handlers::tweets::update_tweet))
                            .route("/{tweetId}", web::delete().to(handlers::tweets::delete_tweet)),
                    ),
            );
        }
    }

    // Scopes mixing public and guarded methods on one path register the
    // guarded ones bare; the `UserId` extractor enforces authentication.
    pub mod comments {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/comments")
                    .route(
                        "/{videoId}",
                        web::get().to(handlers::comments::get_video_comments),
                    )
                    .route("/{videoId}", web::post().to(handlers::comments::add_comment))
                    .route(
                        "/c/{commentId}",
                        web::patch().to(handlers::comments::update_comment),
                    )
                    .route(
                        "/c/{commentId}",
                        web::delete().to(handlers::comments::delete_comment),
                    ),
            );
        }
    }

    pub mod videos {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/videos")
                    .route("", web::get().to(handlers::videos::get_all_videos))
                    .route("", web::post().to(handlers::videos::publish_video))
                    .route(
                        "/toggle/publish/{videoId}",
                        web::patch().to(handlers::videos::toggle_publish_status),
                    )
                    .route("/{videoId}", web::get().to(handlers::videos::get_video))
                    .route("/{videoId}", web::patch().to(handlers::videos::update_video))
                    .route(
                        "/{videoId}",
                        web::delete().to(handlers::videos::delete_video),
                    ),
            );
        }
    }

    pub mod likes {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/likes")
                    .wrap(JwtAuth)
                    .route(
                        "/toggle/video/{videoId}",
                        web::post().to(handlers::likes::toggle_video_like),
                    )
                    .route(
                        "/toggle/comment/{commentId}",
                        web::post().to(handlers::likes::toggle_comment_like),
                    )
                    .route(
                        "/toggle/tweet/{tweetId}",
                        web::post().to(handlers::likes::toggle_tweet_like),
                    )
                    .route("/videos", web::get().to(handlers::likes::get_liked_videos)),
            );
        }
    }

    pub mod subscriptions {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/subscriptions")
                    .route(
                        "/c/{channelId}",
                        web::get().to(handlers::subscriptions::get_channel_subscribers),
                    )
                    .route(
                        "/c/{channelId}",
                        web::post().to(handlers::subscriptions::toggle_subscription),
                    )
                    .route(
                        "/u/{subscriberId}",
                        web::get().to(handlers::subscriptions::get_subscribed_channels),
                    ),
            );
        }
    }

    pub mod playlists {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/playlists")
                    .route("", web::post().to(handlers::playlists::create_playlist))
                    .route(
                        "/user/{userId}",
                        web::get().to(handlers::playlists::get_user_playlists),
                    )
                    .route(
                        "/add/{playlistId}/{videoId}",
                        web::patch().to(handlers::playlists::add_video_to_playlist),
                    )
                    .route(
                        "/remove/{playlistId}/{videoId}",
                        web::patch().to(handlers::playlists::remove_video_from_playlist),
                    )
                    .route(
                        "/{playlistId}",
                        web::get().to(handlers::playlists::get_playlist),
                    )
                    .route(
                        "/{playlistId}",
                        web::patch().to(handlers::playlists::update_playlist),
                    )
                    .route(
                        "/{playlistId}",
                        web::delete().to(handlers::playlists::delete_playlist),
                    ),
            );
        }
    }

    pub mod dashboard {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/dashboard")
                    .wrap(JwtAuth)
                    .route("/stats", web::get().to(handlers::dashboard::get_channel_stats))
                    .route(
                        "/videos",
                        web::get().to(handlers::dashboard::get_channel_videos),
                    ),
            );
        }
    }
}
