use std::{sync::Arc, time::Duration};

use clap::Parser;
use error::AppError;
use hls_resolver::{
    ConsoleSelector, PlaylistRef, PlaylistResolver, PolicySelector, ProxyAuth, ProxyConfig,
    ResolveError, ResolverConfig, VariantSelector,
};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber, filter::LevelFilter};

mod cli;
mod error;
mod output;
mod utils;

use cli::CliArgs;
use utils::{Selection, parse_headers, parse_selection_arg};

fn main() {
    if let Err(e) = bootstrap() {
        eprintln!("Error: {e}");
        error!(error = ?e, "Application failed");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn bootstrap() -> Result<(), AppError> {
    let args = CliArgs::parse();

    let log_level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    // stdout carries the segment list; logs go to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::Initialization(e.to_string()))?;

    let headers = parse_headers(&args.headers);

    let mut config_builder = ResolverConfig::builder()
        .with_timeout(Duration::from_secs(args.timeout))
        .with_connect_timeout(Duration::from_secs(args.connect_timeout))
        .with_max_playlist_depth(usize::try_from(args.max_depth).unwrap_or(usize::MAX));

    if let Some(user_agent) = &args.user_agent {
        config_builder = config_builder.with_user_agent(user_agent);
    }

    config_builder = if args.no_proxy {
        info!("All proxy settings disabled (--no-proxy flag)");
        config_builder.with_system_proxy(false)
    } else if let Some(proxy_url) = &args.proxy {
        let auth = match (&args.proxy_user, &args.proxy_pass) {
            (Some(username), Some(password)) => Some(ProxyAuth {
                username: username.clone(),
                password: password.clone(),
            }),
            (None, None) => None,
            _ => {
                return Err(AppError::InvalidInput(
                    "--proxy-user and --proxy-pass must be given together".to_string(),
                ));
            }
        };
        info!(
            proxy_url = %proxy_url,
            proxy_type = ?args.proxy_type,
            has_auth = auth.is_some(),
            "Using explicit proxy configuration"
        );
        config_builder.with_proxy(ProxyConfig {
            url: proxy_url.clone(),
            proxy_type: args.proxy_type,
            auth,
        })
    } else {
        config_builder
    };

    let selector: Arc<dyn VariantSelector> = match parse_selection_arg(&args.select)? {
        Selection::Interactive => Arc::new(ConsoleSelector::stdio()),
        Selection::Policy(policy) => {
            debug!("Using variant selection policy {policy:?}");
            Arc::new(PolicySelector::new(policy))
        }
    };

    let mut builder = PlaylistResolver::builder()
        .config(config_builder.build())
        .selector(selector);

    if let Some(base_url) = args.base_url.clone() {
        info!("Variant references will be appended to {base_url}");
        builder = builder.base_url(move |_: &str| Ok::<_, ResolveError>(base_url.clone()));
    }

    let resolver = builder.build()?;
    let segments = resolver
        .resolve(&PlaylistRef::with_headers(args.url.clone(), headers))
        .await?;

    let mut stdout = std::io::stdout().lock();
    if args.json {
        output::write_json(&mut stdout, &segments)?;
    } else {
        output::write_plain(&mut stdout, &segments)?;
    }
    Ok(())
}
