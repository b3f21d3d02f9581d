use arena_api::configuration::get_configuration;
use arena_api::domain::Entrant;
use arena_api::startup::Application;
use arena_api::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use uuid::Uuid;

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct TestApp {
    address: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        // `TRACING` is only executed the first time `initialize` is invoked.
        Lazy::force(&TRACING);

        // Randomise configuration to ensure test isolation
        let configuration = {
            let mut c = get_configuration().expect("Failed to read configuration.");
            // Keep the ledger in memory so tests never share history
            c.ledger.data_dir = None;
            // Use a random OS port
            c.application.port = 0;
            c
        };

        // Launch the application as a background task
        let application = Application::build(&configuration)
            .await
            .expect("Failed to build application.");
        let address = format!("http://127.0.0.1:{}", application.port());
        let _ = tokio::spawn(application.run_until_stopped());

        Self { address }
    }

    pub async fn get_health_check(&self) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}/health_check", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post(&self, method: &str, body: String) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/{}", &self.address, method))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_standings(&self, body: String) -> reqwest::Response {
        self.post("standings", body).await
    }

    pub async fn post_register(&self, body: String) -> reqwest::Response {
        self.post("register", body).await
    }

    pub async fn post_outcome(&self, body: String) -> reqwest::Response {
        self.post("outcome", body).await
    }

    pub async fn post_versus(&self, body: String) -> reqwest::Response {
        self.post("versus", body).await
    }

    pub async fn post_history(&self, body: String) -> reqwest::Response {
        self.post("history", body).await
    }

    pub async fn post_trend(&self, body: String) -> reqwest::Response {
        self.post("trend", body).await
    }

    pub async fn post_entrant(&self, body: String) -> reqwest::Response {
        self.post("entrant", body).await
    }

    /// Registers an entrant and returns its server-side identity.
    pub async fn register(&self, name: &str, provider: &str) -> Entrant {
        let response = self
            .post_register(format!("name={}&provider={}", name, provider))
            .await;
        assert_eq!(200, response.status().as_u16());
        response.json().await.expect("Failed to parse as JSON")
    }

    /// Records one debate outcome between two slugs and returns the
    /// raw response.
    pub async fn record(
        &self,
        debate_id: Uuid,
        entrant_a: &str,
        entrant_b: &str,
        outcome: &str,
    ) -> reqwest::Response {
        self.post_outcome(format!(
            "debate_id={}&entrant_a={}&entrant_b={}&outcome={}",
            debate_id, entrant_a, entrant_b, outcome
        ))
        .await
    }
}
