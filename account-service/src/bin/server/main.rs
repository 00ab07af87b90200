use std::sync::Arc;

use account_service::account::ports::AccountRepository;
use account_service::account::ports::AccountServicePort;
use account_service::account::service::AccountService;
use account_service::config::Config;
use account_service::content::ports::ContentRepository;
use account_service::content::ports::ContentServicePort;
use account_service::content::service::ContentService;
use account_service::domain::notification::NotificationSink;
use account_service::inbound::http::router::create_router;
use account_service::outbound::notifications::LogNotifier;
use account_service::outbound::notifications::SmtpNotifier;
use account_service::outbound::repositories::InMemoryAccountRepository;
use account_service::outbound::repositories::InMemoryContentRepository;
use account_service::outbound::repositories::PostgresAccountRepository;
use account_service::outbound::repositories::PostgresContentRepository;
use account_service::outbound::uploads::LocalImageStore;
use auth::PasswordHasher;
use auth::TokenService;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type Services = (Arc<dyn AccountServicePort>, Arc<dyn ContentServicePort>);

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        public_url = %config.server.public_url,
        mail_enabled = config.mail.enabled,
        uploads_dir = %config.uploads.dir,
        "Configuration loaded"
    );

    let tokens = Arc::new(TokenService::new(
        config.jwt.secret.as_bytes(),
        config.jwt.ttls(),
    ));
    let password_hasher = PasswordHasher::with_cost(config.password.cost())?;

    let notifier: Arc<dyn NotificationSink> = if config.mail.enabled {
        tracing::info!(host = %config.mail.host, port = config.mail.port, "Smtp notifier configured");
        Arc::new(SmtpNotifier::new(&config.mail)?)
    } else {
        tracing::warn!("Mail disabled, notifications will only be logged");
        Arc::new(LogNotifier)
    };

    tokio::fs::create_dir_all(&config.uploads.dir).await?;
    let images = Arc::new(LocalImageStore::new(&config.uploads.dir));

    let (account_service, content_service) = if config.database.url.is_empty() {
        tracing::warn!("No database url configured, using in-memory storage");
        let accounts = InMemoryAccountRepository::new();
        let contents = InMemoryContentRepository::new(accounts.clone());
        build_services(
            &config,
            Arc::new(accounts),
            Arc::new(contents),
            notifier,
            images,
            Arc::clone(&tokens),
            password_hasher,
        )
    } else {
        let pg_pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;
        tracing::info!(
            max_connections = config.database.max_connections,
            database = "postgresql",
            "Database connection pool created"
        );

        sqlx::migrate!("./migrations").run(&pg_pool).await?;
        tracing::info!(database = "postgresql", "Database migrations completed");

        build_services(
            &config,
            Arc::new(PostgresAccountRepository::new(pg_pool.clone())),
            Arc::new(PostgresContentRepository::new(pg_pool)),
            notifier,
            images,
            Arc::clone(&tokens),
            password_hasher,
        )
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        account_service,
        content_service,
        tokens,
        &config.uploads.dir,
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}

fn build_services<AR, CR>(
    config: &Config,
    accounts: Arc<AR>,
    contents: Arc<CR>,
    notifier: Arc<dyn NotificationSink>,
    images: Arc<LocalImageStore>,
    tokens: Arc<TokenService>,
    password_hasher: PasswordHasher,
) -> Services
where
    AR: AccountRepository,
    CR: ContentRepository,
{
    let account_service: Arc<dyn AccountServicePort> = Arc::new(AccountService::new(
        accounts,
        notifier,
        Arc::clone(&images),
        tokens,
        password_hasher,
        config.server.public_url.clone(),
    ));
    let content_service: Arc<dyn ContentServicePort> =
        Arc::new(ContentService::new(contents, images));

    (account_service, content_service)
}
