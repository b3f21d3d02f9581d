use crate::configuration::Settings;
use crate::routes::{
    health_check, rebuild_store, record_outcome, register_entrant, request_entrant,
    request_history, request_standings, request_trend, request_versus, reverse_event,
};
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use arena_rating::Arena;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: &Settings) -> Result<Self, anyhow::Error> {
        let rating_config = configuration.rating.as_config();
        let arena = match &configuration.ledger.data_dir {
            Some(data_dir) => Arena::open(rating_config, data_dir)?,
            None => Arena::new(rating_config),
        };

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(listener, arena)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(listener: TcpListener, arena: Arena) -> Result<Server, std::io::Error> {
    let arena = web::Data::new(arena);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/standings", web::post().to(request_standings))
            .route("/entrant", web::post().to(request_entrant))
            .route("/history", web::post().to(request_history))
            .route("/trend", web::post().to(request_trend))
            .route("/versus", web::post().to(request_versus))
            .route("/register", web::post().to(register_entrant))
            .route("/outcome", web::post().to(record_outcome))
            .route("/reverse", web::post().to(reverse_event))
            .route("/rebuild", web::post().to(rebuild_store))
            .app_data(arena.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
