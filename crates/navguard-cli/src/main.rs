//! navguard CLI
//!
//! Evaluate navigations and inspect guard state offline, from a config file
//! and a session snapshot.

use anyhow::Context;
use clap::{Parser, Subcommand};
use navguard_config_file::FileConfigStore;
use navguard_core::{ConfigStore, LoggingConfig, NavguardConfig, RouteSource, SessionState};
use navguard_observability::Metrics;
use navguard_routing::{
    EvaluationContext, Evaluation, NavigationGuard, RedirectResolver, RedirectTarget,
    RouteRegistry, StaticRouteSource, VerificationState, spawn_extension_loader,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "navguard")]
#[command(about = "navguard - navigation authorization engine", long_about = None)]
struct Cli {
    /// Path to the YAML or TOML configuration file
    #[arg(long, global = true, env = "NAVGUARD_CONFIG", default_value = "~/.navguard/app.yaml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error), overrides `logging.level`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON, overrides `logging.json`
    #[arg(long, global = true, default_value = "false")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a navigation to a route
    Evaluate {
        /// Route name, e.g. admin.dashboard.index
        route: String,

        /// JSON session snapshot (anonymous when omitted)
        #[arg(long)]
        session: Option<PathBuf>,

        /// Mark a product or module as not verified
        #[arg(long = "unverified")]
        unverified: Vec<String>,

        /// Route parameter as key=value
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Print Prometheus metrics after the evaluation
        #[arg(long, default_value = "false")]
        metrics: bool,
    },
    /// Show the module verification entries
    Modules {
        /// Mark a product or module as not verified
        #[arg(long = "unverified")]
        unverified: Vec<String>,
    },
    /// Resolve a logical redirect target to a route name
    Resolve {
        /// login, verify-main, module-settings, admin-dashboard, ...
        target: RedirectTarget,
    },
}

#[derive(Serialize)]
struct EvaluationReport<'a> {
    route: &'a str,
    area: &'a str,
    registry_version: u64,
    registry_committed_at: String,
    #[serde(flatten)]
    evaluation: &'a Evaluation,
    session: &'a SessionState,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

fn expand(path: &std::path::Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string())
}

/// Apply command-line overrides to the configured logging settings
fn effective_logging(config: &LoggingConfig, level: Option<&str>, json: bool) -> LoggingConfig {
    LoggingConfig {
        level: level.map_or_else(|| config.level.clone(), str::to_string),
        json: json || config.json,
    }
}

/// The store expands `~` itself
async fn load_config(path: &std::path::Path) -> anyhow::Result<NavguardConfig> {
    let store = FileConfigStore::new(path)
        .await
        .with_context(|| format!("opening config {}", path.display()))?;
    Ok(store.get_config().await?)
}

fn load_session(path: Option<&std::path::Path>) -> anyhow::Result<SessionState> {
    let Some(path) = path else {
        return Ok(SessionState::anonymous());
    };

    let path = expand(path);
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("reading session {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing session {}", path.display()))
}

fn mark_unverified(verification: &mut VerificationState, names: &[String]) {
    for name in names {
        verification.set_verified(name, false);
    }
}

/// Build the guard the way a host application would at startup
async fn build_guard(config: &NavguardConfig) -> anyhow::Result<NavigationGuard> {
    let registry = Arc::new(RouteRegistry::from_definitions(config.routes.clone())?);

    let sources: Vec<Arc<dyn RouteSource>> = vec![Arc::new(StaticRouteSource::new(
        "config",
        config.extensions.clone(),
    ))];
    if let Some(loader) =
        spawn_extension_loader(registry.clone(), sources, config.app.tenancy_mode)
    {
        // One-shot process: wait for the extensions before evaluating
        loader.await.context("extension loader panicked")?;
    }

    let context = EvaluationContext::new(config.app.clone())
        .with_notifications(config.notifications.clone());

    Ok(NavigationGuard::new(registry, context))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config).await?;

    let logging = effective_logging(&config.logging, cli.log_level.as_deref(), cli.json_logs);
    navguard_observability::init_logging(&logging)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    match cli.command {
        Commands::Evaluate {
            route,
            session,
            unverified,
            params,
            metrics,
        } => {
            let mut session = load_session(session.as_deref())?;
            let mut guard = build_guard(&config).await?;
            mark_unverified(guard.context_mut().verification_mut(), &unverified);

            let collector = if metrics {
                Some(Arc::new(Metrics::new()?))
            } else {
                None
            };
            if let Some(collector) = &collector {
                guard = guard.with_metrics(collector.clone());
            }

            let params: BTreeMap<String, String> = params.into_iter().collect();
            let request = guard.registry().request_for(&route, params);
            let evaluation = guard.navigate_request(&request, &mut session);

            let snapshot = guard.registry().snapshot();
            let report = EvaluationReport {
                route: request.name(),
                area: request.area().as_str(),
                registry_version: snapshot.version(),
                registry_committed_at: snapshot.committed_at().to_rfc3339(),
                evaluation: &evaluation,
                session: &session,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);

            if let Some(collector) = &collector {
                print!("{}", collector.render()?);
            }
        }
        Commands::Modules { unverified } => {
            let mut verification = VerificationState::build(&config.app);
            mark_unverified(&mut verification, &unverified);
            println!("{}", serde_json::to_string_pretty(&verification)?);
        }
        Commands::Resolve { target } => {
            let resolver = RedirectResolver::new(config.app.tenancy_mode);
            println!("{}", resolver.resolve(target));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("type=items").unwrap(),
            ("type".to_string(), "items".to_string())
        );
        assert_eq!(
            parse_param("filter=a=b").unwrap(),
            ("filter".to_string(), "a=b".to_string())
        );
        assert!(parse_param("missing").is_err());
        assert!(parse_param("=value").is_err());
    }

    #[test]
    fn test_cli_parses_evaluate() {
        let cli = Cli::try_parse_from([
            "navguard",
            "--config",
            "app.yaml",
            "evaluate",
            "admin.stock.items.index",
            "--unverified",
            "Stock",
            "--param",
            "type=items",
        ])
        .unwrap();

        match cli.command {
            Commands::Evaluate {
                route,
                unverified,
                params,
                ..
            } => {
                assert_eq!(route, "admin.stock.items.index");
                assert_eq!(unverified, vec!["Stock"]);
                assert_eq!(params, vec![("type".to_string(), "items".to_string())]);
            }
            _ => panic!("expected evaluate"),
        }
    }

    #[test]
    fn test_cli_parses_resolve_target() {
        let cli = Cli::try_parse_from(["navguard", "resolve", "module-settings"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Resolve {
                target: RedirectTarget::ModuleSettings
            }
        ));
    }

    #[test]
    fn test_logging_comes_from_config_unless_overridden() {
        let configured = LoggingConfig {
            level: "debug".to_string(),
            json: true,
        };

        let cli = Cli::try_parse_from(["navguard", "resolve", "login"]).unwrap();
        assert!(cli.log_level.is_none());
        let logging = effective_logging(&configured, cli.log_level.as_deref(), cli.json_logs);
        assert_eq!(logging.level, "debug");
        assert!(logging.json);

        let cli = Cli::try_parse_from(["navguard", "--log-level", "error", "resolve", "login"])
            .unwrap();
        let logging = effective_logging(
            &LoggingConfig::default(),
            cli.log_level.as_deref(),
            cli.json_logs,
        );
        assert_eq!(logging.level, "error");
        assert!(!logging.json);

        let logging = effective_logging(&LoggingConfig::default(), None, true);
        assert_eq!(logging.level, LoggingConfig::default().level);
        assert!(logging.json);
    }

    #[tokio::test]
    async fn test_config_file_drives_logging() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        std::fs::write(
            file.path(),
            "app:\n  main_product_registered: true\nlogging:\n  level: debug\n  json: true\n",
        )
        .unwrap();

        let config = load_config(file.path()).await.unwrap();
        let logging = effective_logging(&config.logging, None, false);
        assert_eq!(logging.level, "debug");
        assert!(logging.json);
    }

    #[test]
    fn test_session_path_expands_tilde() {
        let plain = expand(std::path::Path::new("/tmp/session.json"));
        assert_eq!(plain, PathBuf::from("/tmp/session.json"));

        if std::env::var_os("HOME").is_some() {
            let expanded = expand(std::path::Path::new("~/session.json"));
            assert!(!expanded.starts_with("~"));
            assert!(expanded.ends_with("session.json"));
        }
    }

    #[test]
    fn test_anonymous_session_by_default() {
        assert_eq!(load_session(None).unwrap(), SessionState::anonymous());
    }
}
