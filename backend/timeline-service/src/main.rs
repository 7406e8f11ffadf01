use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use db_pool::{create_pool, DbConfig};
use sqlx::PgPool;
use std::sync::Arc;
use timeline_service::db::{
    PgCommentRepository, PgLikeRepository, PgPostRepository, PgUserRepository,
};
use timeline_service::handlers::{self, AppState};
use timeline_service::middleware::IdentityMiddleware;
use timeline_service::services::{
    CommentService, FeedService, LikeService, PostService, UserService,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn health_summary(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "timeline-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "timeline-service"
        })),
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match timeline_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            anyhow::bail!("failed to load configuration: {e}");
        }
    };

    tracing::info!("Starting timeline-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let mut db_cfg = DbConfig::from_env("timeline-service").unwrap_or_else(|_| DbConfig {
        service_name: "timeline-service".into(),
        database_url: config.database.url.clone(),
        ..DbConfig::default()
    });
    if db_cfg.max_connections < config.database.max_connections {
        db_cfg.max_connections = config.database.max_connections;
    }

    db_cfg.log_config();
    let db_pool = create_pool(db_cfg).await?;

    sqlx::migrate!().run(&db_pool).await?;
    tracing::info!("Database migrations applied");

    // Explicit wiring: repositories into services, services into state
    let user_repo = Arc::new(PgUserRepository::new(db_pool.clone()));
    let post_repo = Arc::new(PgPostRepository::new(db_pool.clone()));
    let comment_repo = Arc::new(PgCommentRepository::new(db_pool.clone()));
    let like_repo = Arc::new(PgLikeRepository::new(db_pool.clone()));

    let state = AppState {
        users: UserService::new(user_repo.clone(), post_repo.clone()),
        posts: PostService::new(post_repo.clone()),
        comments: CommentService::new(comment_repo.clone(), post_repo.clone(), user_repo.clone()),
        likes: LikeService::new(post_repo.clone(), like_repo.clone()),
        feed: FeedService::new(post_repo, user_repo, comment_repo, like_repo),
        feed_config: config.feed.clone(),
    };

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            // Health check endpoints
            .route("/health", web::get().to(health_summary))
            .route("/health/live", web::get().to(liveness_check))
            .service(
                web::scope("/api/v1")
                    .wrap(IdentityMiddleware)
                    .service(
                        web::scope("/users")
                            .service(web::resource("").route(web::post().to(handlers::register)))
                            .service(
                                web::resource("/me")
                                    .route(web::get().to(handlers::get_me))
                                    .route(web::patch().to(handlers::update_me)),
                            )
                            .service(
                                web::resource("/search")
                                    .route(web::get().to(handlers::search_users)),
                            )
                            .service(
                                web::resource("/{user_id}")
                                    .route(web::get().to(handlers::get_user)),
                            ),
                    )
                    .service(
                        web::scope("/feed")
                            .route("", web::get().to(handlers::get_feed))
                            .route("/user/{user_id}", web::get().to(handlers::get_user_feed)),
                    )
                    .service(
                        web::scope("/posts")
                            .service(
                                web::resource("").route(web::post().to(handlers::create_post)),
                            )
                            .service(
                                web::resource("/{post_id}")
                                    .route(web::get().to(handlers::get_post))
                                    .route(web::put().to(handlers::update_post))
                                    .route(web::delete().to(handlers::delete_post)),
                            )
                            .service(
                                web::resource("/{post_id}/comments")
                                    .route(web::post().to(handlers::create_comment))
                                    .route(web::get().to(handlers::get_post_comments)),
                            ),
                    )
                    .service(
                        web::scope("/comments")
                            .service(
                                web::resource("/user/{user_id}")
                                    .route(web::get().to(handlers::get_user_comments)),
                            )
                            .service(
                                web::resource("/{comment_id}")
                                    .route(web::put().to(handlers::update_comment))
                                    .route(web::delete().to(handlers::delete_comment)),
                            ),
                    )
                    .service(
                        web::scope("/likes")
                            .route("/toggle/{post_id}", web::post().to(handlers::toggle_like))
                            .route("/check/{post_id}", web::get().to(handlers::check_like)),
                    ),
            )
    })
    .bind(&bind_address)?
    .run();

    server.await?;

    tracing::info!("timeline-service shutting down");
    Ok(())
}
