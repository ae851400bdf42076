use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use opord_core::export::credentials::{code_from_redirect, ClientSecrets, FileCredentialProvider};
use opord_core::{
    Enricher, ExportOutcome, FormFields, OpordConfig, OpordDocument, OpordResult, OpordService,
    SlidesExporter, SubordinateUnit,
};

#[derive(Parser)]
#[command(name = "opord")]
#[command(about = "Operation order generator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an order from a flat JSON form
    Generate {
        /// Path to a JSON object of form fields
        #[arg(long)]
        form: PathBuf,
        /// Fill blank narrative fields with the language model
        #[arg(long)]
        ai: bool,
        /// Model override for this run
        #[arg(long)]
        model: Option<String>,
        /// Also write the structured document JSON here
        #[arg(long)]
        document_out: Option<PathBuf>,
        /// Print the structured document instead of the text order
        #[arg(long)]
        json: bool,
    },
    /// Export a previously generated document to Google Slides
    Export {
        /// Path to a document JSON written by `generate --document-out`
        #[arg(long)]
        document: PathBuf,
    },
    /// Authorise Google Slides access and cache the token
    Authorise,
    /// List the subordinate unit catalog and its form keys
    Units,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("opord_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = OpordConfig::from_env_values(|key| std::env::var(key).ok())?;

    match cli.command {
        Some(Commands::Generate {
            form,
            ai,
            model,
            document_out,
            json,
        }) => generate(&config, form, ai, model, document_out, json).await?,
        Some(Commands::Export { document }) => export(&config, document).await?,
        Some(Commands::Authorise) => authorise(&config).await?,
        Some(Commands::Units) => {
            for unit in SubordinateUnit::ALL {
                println!("{:<32} {}", unit.name(), unit.form_key());
            }
        }
        None => {
            println!("Use 'opord --help' for commands");
        }
    }

    Ok(())
}

async fn generate(
    config: &OpordConfig,
    form: PathBuf,
    ai: bool,
    model: Option<String>,
    document_out: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(&form)
        .with_context(|| format!("reading form {}", form.display()))?;
    let fields: FormFields = serde_json::from_str(&contents)
        .with_context(|| format!("parsing form {}", form.display()))?;

    let service = OpordService::new(Enricher::from_config(&config.ai)?);
    if ai && !service.ai_available() {
        eprintln!("AI generation is not configured; generating from the form as given.");
    }

    let outcome = service.generate(&fields, ai, model.as_deref()).await;
    for failure in &outcome.failures {
        eprintln!("{}", failure.message());
    }

    let document_json = outcome.order.document.to_json()?;
    if let Some(path) = document_out {
        std::fs::write(&path, &document_json)
            .with_context(|| format!("writing document {}", path.display()))?;
    }

    if json {
        println!("{document_json}");
    } else {
        println!("{}", outcome.order.text);
    }
    Ok(())
}

async fn export(config: &OpordConfig, document: PathBuf) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(&document)
        .with_context(|| format!("reading document {}", document.display()))?;
    let doc = OpordDocument::from_json(&contents)?;

    let exporter = SlidesExporter::from_config(&config.slides)?;
    let url = exported_url(exporter.export(&doc).await)?;
    println!("Presentation created: {url}");
    Ok(())
}

/// The presentation URL, or an error for an unavailable or failed export.
fn exported_url(outcome: OpordResult<ExportOutcome>) -> anyhow::Result<String> {
    match outcome {
        Ok(ExportOutcome::Exported { url, .. }) => Ok(url),
        Ok(ExportOutcome::Unavailable(reason)) => bail!("{}", reason.message()),
        Err(e) => bail!("Export to Google Slides failed: {e}"),
    }
}

/// Installed-app consent flow: print the consent URL, wait for the loopback redirect and cache
/// the token it yields.
async fn authorise(config: &OpordConfig) -> anyhow::Result<()> {
    let secrets_path = config
        .slides
        .credentials_file()
        .context("GOOGLE_CREDENTIALS_FILE is not set")?
        .to_path_buf();
    let secrets = ClientSecrets::load(&secrets_path)?;

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let redirect_uri = format!("http://127.0.0.1:{}/", listener.local_addr()?.port());
    println!(
        "Open this URL in a browser to authorise access:\n\n{}\n",
        secrets.consent_url(&redirect_uri)?
    );

    let (stream, _) = listener.accept().await?;
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    let code = request_target(&request_line)
        .context("malformed redirect request")
        .and_then(|target| Ok(code_from_redirect(target)?));

    let reply = if code.is_ok() {
        "Authorisation complete. You can close this tab."
    } else {
        "Authorisation failed. Check the terminal."
    };
    let mut stream = reader.into_inner();
    stream
        .write_all(
            format!(
                "HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{reply}",
                reply.len()
            )
            .as_bytes(),
        )
        .await?;

    let provider = FileCredentialProvider::new(
        secrets_path,
        config.slides.token_file().to_path_buf(),
        config.slides.timeout_secs(),
    )?;
    provider.exchange_code(&code?, &redirect_uri).await?;
    println!("Token cached at {}", provider.token_cache().display());
    Ok(())
}

/// The target of an HTTP request line, e.g. `/?code=..` from `GET /?code=.. HTTP/1.1`.
fn request_target(line: &str) -> Option<&str> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("GET"), Some(target)) => Some(target),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opord_core::{OpordError, UnavailableReason};

    #[test]
    fn request_target_reads_get_lines_only() {
        assert_eq!(
            request_target("GET /?code=abc&scope=x HTTP/1.1\r\n"),
            Some("/?code=abc&scope=x")
        );
        assert_eq!(request_target("POST / HTTP/1.1\r\n"), None);
        assert_eq!(request_target(""), None);
    }

    #[test]
    fn cli_parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "opord",
            "generate",
            "--form",
            "form.json",
            "--ai",
            "--model",
            "gpt-4o-mini",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Generate {
                form,
                ai,
                model,
                document_out,
                json,
            }) => {
                assert_eq!(form, PathBuf::from("form.json"));
                assert!(ai);
                assert_eq!(model.as_deref(), Some("gpt-4o-mini"));
                assert!(document_out.is_none());
                assert!(json);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn export_that_does_not_produce_a_presentation_is_an_error() {
        let unavailable = exported_url(Ok(ExportOutcome::Unavailable(
            UnavailableReason::AuthorisationRequired,
        )))
        .unwrap_err();
        assert!(unavailable.to_string().contains("opord authorise"));

        let failed = exported_url(Err(OpordError::SlidesApi {
            status: 403,
            body: "forbidden".into(),
        }))
        .unwrap_err();
        assert!(failed
            .to_string()
            .starts_with("Export to Google Slides failed: "));

        let url = exported_url(Ok(ExportOutcome::Exported {
            presentation_id: "abc".into(),
            url: "https://docs.google.com/presentation/d/abc/edit".into(),
        }))
        .unwrap();
        assert!(url.ends_with("/abc/edit"));
    }
}
