use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use chatter::{
    auth::session::SessionCodec,
    config, error, logging, routes,
    services::bus::MessageBus,
    state::AppState,
    store::{ChatStore, InMemoryChatStore, InMemoryUserStore, UserStore},
};

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    logging::init_tracing();
    let cfg = Arc::new(config::Config::from_env()?);

    let chats: Arc<dyn ChatStore> = Arc::new(InMemoryChatStore::new());
    let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
    let bus = MessageBus::new();
    let sessions = Arc::new(SessionCodec::new(&cfg.jwt_secret));

    let state = AppState {
        chats,
        users,
        bus,
        sessions,
        config: cfg.clone(),
    };

    let bind_addr = format!("0.0.0.0:{}", cfg.port);
    tracing::info!(
        %bind_addr,
        suppress_self_echo = cfg.suppress_self_echo,
        "starting chatter"
    );

    HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .service(routes::auth::login)
            .service(routes::auth::logout)
            .service(routes::users::register)
            .service(routes::chats::create_chat)
            .service(routes::chats::list_chats)
            .service(routes::chats::get_chat)
            .service(routes::messages::send_message)
            .service(routes::messages::get_messages)
            .service(routes::wsroute::ws_handler)
            .route("/health", web::get().to(|| async { "OK" }))
    })
    .bind(&bind_addr)
    .map_err(|e| error::AppError::StartServer(format!("bind: {e}")))?
    .run()
    .await
    .map_err(|e| error::AppError::StartServer(format!("server: {e}")))
}
