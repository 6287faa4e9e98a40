//! mailview CLI - run the email rendering pipeline over a file

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mailview::{
    HostPayload, Pipeline, RenderConfig, TransferEncoding, has_quoted_html, remove_quoted_html,
};

#[derive(Parser)]
#[command(name = "mailview")]
#[command(version)]
#[command(about = "Prepare HTML email bodies for narrow, dark-mode message views", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every pass and print the transformed container html
    Render {
        /// Input html file (or host payload JSON with --payload)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Apply dark-mode colour inversion
        #[arg(long)]
        dark: bool,

        /// Viewport width in CSS pixels
        #[arg(long, value_name = "PX")]
        width: Option<f64>,

        /// Off-screen cutoff in CSS pixels
        #[arg(long, value_name = "PX")]
        screen_height: Option<f64>,

        /// Treat the input as a host payload `{"html": ..., "isDarkMode": ...}`
        #[arg(long)]
        payload: bool,

        /// Payload html is base64 rather than percent-encoded
        #[arg(long, requires = "payload")]
        base64: bool,
    },

    /// Exit with status 0 when the message contains quoted html, 1 otherwise
    HasQuotes {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the message with quoted html removed
    StripQuotes {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            dark,
            width,
            screen_height,
            payload,
            base64,
        } => {
            let mut builder = RenderConfig::builder();
            if let Some(width) = width {
                builder = builder.viewport_width(width);
            }
            if let Some(height) = screen_height {
                builder = builder.screen_height(height);
            }
            let config = builder.build()?;

            let raw = read_input(&input)?;
            let (html, dark) = if payload {
                let encoding = if base64 {
                    TransferEncoding::Base64
                } else {
                    TransferEncoding::Percent
                };
                let payload = HostPayload::from_json(&raw)?;
                (payload.decode_html(encoding)?, payload.is_dark_mode || dark)
            } else {
                (raw, dark)
            };

            let output = Pipeline::with_static_layout(config).render(&html, dark)?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", output.html)?;
            eprintln!("{}", serde_json::to_string_pretty(&output.signals)?);
        }
        Commands::HasQuotes { input } => {
            let html = read_input(&input)?;
            let found = has_quoted_html(&html);
            println!("{found}");
            if !found {
                std::process::exit(1);
            }
        }
        Commands::StripQuotes { input } => {
            let html = read_input(&input)?;
            println!("{}", remove_quoted_html(&html));
        }
    }

    Ok(())
}
