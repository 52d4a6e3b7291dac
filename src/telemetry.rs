use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "info,chirpy=debug";

/// Initialise le subscriber global.
///
/// Sans effet si un subscriber est déjà installé (hôte, ou un autre test).
pub fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        // Si RUST_LOG n'est pas défini, utiliser ces règles par défaut
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

    if tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_err()
    {
        tracing::debug!("Global subscriber already installed");
    }
}
