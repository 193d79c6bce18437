use std::{future::IntoFuture, process, sync::Arc};

use jotter::{
    application::{
        admin::{
            authors::AdminAuthorService, chrome::AdminChromeService,
            dashboard::AdminDashboardService, posts::AdminPostService,
        },
        blog::BlogService,
        chrome::ChromeService,
        error::AppError,
        repos::{AuthorsRepo, AuthorsWriteRepo, PostsRepo, PostsWriteRepo},
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, HttpState},
        telemetry,
    },
};
use tokio::{sync::watch, try_join};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings.database).await?;
    let (http_state, admin_state) = build_application_context(repositories, &settings);
    serve_http(&settings.server, http_state, admin_state).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings.database).await?;
    info!(target = "jotter::migrate", "database schema is up to date");
    repositories.pool().close().await;
    Ok(())
}

/// Connect the pool and apply pending migrations.
async fn init_repositories(
    database: &config::DatabaseSettings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_application_context(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> (HttpState, AdminState) {
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let authors_repo: Arc<dyn AuthorsRepo> = repositories.clone();
    let authors_write_repo: Arc<dyn AuthorsWriteRepo> = repositories.clone();
    let timezone = settings.site.timezone;

    let http_state = HttpState {
        blog: Arc::new(BlogService::new(posts_repo.clone(), authors_repo.clone())),
        chrome: Arc::new(ChromeService::new(settings.site.clone())),
        db: repositories.clone(),
        timezone,
    };

    let admin_state = AdminState {
        db: repositories,
        chrome: Arc::new(AdminChromeService::new(settings.site.title.clone())),
        dashboard: Arc::new(AdminDashboardService::new(
            posts_repo.clone(),
            authors_repo.clone(),
        )),
        authors: Arc::new(AdminAuthorService::new(
            authors_repo.clone(),
            authors_write_repo,
            timezone,
        )),
        posts: Arc::new(AdminPostService::new(
            posts_repo,
            posts_write_repo,
            authors_repo,
            timezone,
        )),
        timezone,
    };

    (http_state, admin_state)
}

async fn serve_http(
    server: &config::ServerSettings,
    http_state: HttpState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_router(http_state);
    let admin_router = http::build_admin_router(admin_state);

    let public_listener = tokio::net::TcpListener::bind(server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "jotter::serve",
        public_addr = %server.public_addr,
        admin_addr = %server.admin_addr,
        "listening"
    );

    let (stop_tx, stop_rx) = watch::channel(false);

    let public_server = axum::serve(public_listener, public_router.into_make_service())
        .with_graceful_shutdown(stopped(stop_rx.clone()))
        .into_future();
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service())
        .with_graceful_shutdown(stopped(stop_rx))
        .into_future();

    let servers = async { try_join!(public_server, admin_server) };
    tokio::pin!(servers);

    let result = tokio::select! {
        result = &mut servers => result,
        () = shutdown_signal() => {
            info!(target = "jotter::serve", "shutdown requested, draining connections");
            let _ = stop_tx.send(true);
            match tokio::time::timeout(server.graceful_shutdown, &mut servers).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        target = "jotter::serve",
                        timeout_secs = server.graceful_shutdown.as_secs(),
                        "graceful shutdown timed out"
                    );
                    Ok(((), ()))
                }
            }
        }
    };

    result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn stopped(mut stop: watch::Receiver<bool>) {
    while !*stop.borrow_and_update() {
        if stop.changed().await.is_err() {
            return;
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target = "jotter::serve", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(target = "jotter::serve", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
