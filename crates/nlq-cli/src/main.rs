//! nlq-search: turn a natural-language vulnerability query into a
//! structured search filter.
//!
//! Usage: `nlq-search <config.toml> <query...>`
//!
//! Prints the parse result (or the classified error) as JSON on stdout;
//! logs go to stderr.

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use nlq_cli::config::CliConfig;
use nlq_cli::filters;
use nlq_cli::ollama::OllamaProvider;
use nlq_parser::{AiSearchParser, CancellableError, CancellableRequest, make_cancellable};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .unwrap_or_else(|| "/etc/nlq/nlq.toml".to_string());
    let query = args.collect::<Vec<_>>().join(" ");
    if query.is_empty() {
        anyhow::bail!("usage: nlq-search <config.toml> <query...>");
    }

    // ── Load config ─────────────────────────────────────────────
    let config = CliConfig::from_file(&config_path)?;
    let filter_config = filters::resolve_filter_config(config.filter_config_path.as_deref())?;
    tracing::info!(
        config = %config_path,
        entities = filter_config.len(),
        model = %config.ollama.model,
        "config loaded"
    );

    // ── Provider + parser ───────────────────────────────────────
    let provider = OllamaProvider::new(config.ollama.clone())?;
    let parser = Arc::new(AiSearchParser::new(Arc::new(provider), config.parser));
    if !parser.is_provider_available().await {
        tracing::warn!(
            host = %config.ollama.host,
            "ollama is not reachable, the request will likely fail"
        );
    }

    // ── Run, cancellable from Ctrl-C ────────────────────────────
    let CancellableRequest { request, cancel } = make_cancellable({
        let parser = parser.clone();
        move |_token| async move {
            parser
                .parse_natural_language_query(&query, &filter_config)
                .await
        }
    });

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling request");
            cancel.cancel();
        }
    });

    match request.await {
        Ok(result) => {
            if parser.is_low_confidence(&result) {
                tracing::warn!(
                    confidence = result.confidence,
                    min_confidence = parser.min_confidence(),
                    "low-confidence result, review before applying"
                );
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(CancellableError::Cancelled) => {
            tracing::info!("request cancelled");
            Ok(ExitCode::from(130))
        }
        Err(CancellableError::Failed(err)) => {
            println!("{}", serde_json::to_string_pretty(&err)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
