// Headless entry point: run one refresh cycle and print the snapshot.
// Useful for wiring up credentials and inspecting the cache without a
// menu-bar frontend attached.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use octobar::{
    CacheStore, CredentialStore, Credentials, FreshnessPolicy, GitHubClient, PreferencesStore,
    RefreshCoordinator,
};

/// Environment variables win over the preferences file, so a token never
/// has to be written to disk just to try the tool out.
struct EnvOrPrefsCredentials {
    prefs: Option<PreferencesStore>,
}

impl CredentialStore for EnvOrPrefsCredentials {
    fn credentials(&self) -> Credentials {
        let from_env = Credentials::new(
            env::var("GITHUB_USERNAME").unwrap_or_default(),
            env::var("GITHUB_TOKEN").unwrap_or_default(),
        );
        if from_env.is_complete() {
            return from_env;
        }
        self.prefs
            .as_ref()
            .map(|store| store.credentials())
            .unwrap_or_default()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let force = env::args().any(|arg| arg == "--force");

    let credentials = EnvOrPrefsCredentials {
        prefs: PreferencesStore::open_default(),
    };
    if !credentials.credentials().is_complete() {
        eprintln!(
            "no credentials: set GITHUB_USERNAME and GITHUB_TOKEN, or store them in the preferences file"
        );
        return ExitCode::FAILURE;
    }

    let Some(cache) = CacheStore::open_default() else {
        eprintln!("could not determine a cache directory for this platform");
        return ExitCode::FAILURE;
    };

    let client = match GitHubClient::new() {
        Ok(client) => client,
        Err(err) => {
            eprintln!("failed to build HTTP client: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let coordinator = Arc::new(RefreshCoordinator::new(
        Arc::new(credentials),
        Arc::new(client),
        cache,
        FreshnessPolicy::default(),
    ));

    let seeded = coordinator.state().snapshot();
    println!(
        "cached: {} repositories, {} contribution days",
        seeded.repositories.len(),
        seeded.contributions.len()
    );

    coordinator.refresh_now(force).await;

    let snapshot = coordinator.state().snapshot();
    if let Some(err) = &snapshot.last_error {
        eprintln!("refresh finished with an error: {}", err);
    }

    println!("repositories:");
    for repo in &snapshot.repositories {
        println!(
            "  {:<30} {:<12} updated {}",
            repo.full_name,
            repo.language.as_deref().unwrap_or("-"),
            repo.updated_at.format("%Y-%m-%d %H:%M")
        );
    }

    let total: u64 = snapshot.contributions.iter().map(|d| u64::from(d.count)).sum();
    println!(
        "contributions: {} days covering {}..{}, {} total",
        snapshot.contributions.len(),
        snapshot
            .contributions
            .first()
            .map(|d| d.date.to_string())
            .unwrap_or_else(|| "-".to_string()),
        snapshot
            .contributions
            .last()
            .map(|d| d.date.to_string())
            .unwrap_or_else(|| "-".to_string()),
        total
    );

    ExitCode::SUCCESS
}
