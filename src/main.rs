use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use scroll_narrative::contact::{LogTransport, ResendTransport};
use scroll_narrative::field::layout_for;
use scroll_narrative::runtime::{wrap_host_module, DEFAULT_TAG, DEFAULT_WASM_URL};
use scroll_narrative::server::{run_server, ServerConfig};
use scroll_narrative::{simulate, NarrativeConfig, Viewport, ViewportMode, DEFAULT_SCRIPT};

#[derive(Parser)]
#[command(name = "narrative", version)]
#[command(about = "Scroll-driven \"How We Build Games\" section: simulate, lay out, and serve")]
struct Cli {
    /// JSON config file (missing keys take their defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the reducer over a scripted progress sequence
    Simulate {
        /// Comma-separated progress samples (default 0,0.2,0.4,0.6,0.8,1.0)
        #[arg(long, value_delimiter = ',')]
        progress: Vec<f64>,

        /// Print one JSON state per line instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the decorative field generated for a viewport as JSON
    Layout {
        #[arg(long)]
        width: f64,

        #[arg(long)]
        height: f64,

        /// Seed for the scatter generator (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Force the fixed small-screen catalog regardless of width
        #[arg(long)]
        mobile: bool,
    },

    /// Write the browser host module (custom element + frame loop)
    HostJs {
        /// Custom element tag name
        #[arg(long, default_value = DEFAULT_TAG)]
        tag: String,

        /// URL of the wasm-bindgen shim, relative to the module
        #[arg(long, default_value = DEFAULT_WASM_URL)]
        wasm_url: String,

        /// Write output to file instead of stdout
        #[arg(short)]
        o: Option<PathBuf>,
    },

    /// Serve the contact relay, host module and preview page
    Serve {
        #[arg(long, default_value_t = 3000)]
        port: u16,

        /// Log submissions instead of delivering them
        #[arg(long)]
        dry_run: bool,

        /// Custom element tag name
        #[arg(long, default_value = DEFAULT_TAG)]
        tag: String,

        /// URL of the wasm-bindgen shim as seen by the browser
        #[arg(long, default_value = DEFAULT_WASM_URL)]
        wasm_url: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => NarrativeConfig::load(path)?,
        None => NarrativeConfig::default(),
    };

    match cli.command {
        Commands::Simulate { progress, json } => {
            let script = if progress.is_empty() { DEFAULT_SCRIPT.to_vec() } else { progress };
            let states = simulate(&script);
            for state in &states {
                if json {
                    println!("{}", serde_json::to_string(state)?);
                } else {
                    println!(
                        "progress {:>5.3}  chapter {}  assets {}/5  sentences {}/3",
                        state.scroll.progress,
                        state.scroll.chapter.index(),
                        state.reveal.visible_assets(),
                        state.reveal.visible_sentences(),
                    );
                }
            }
        }

        Commands::Layout { width, height, seed, mobile } => {
            if !(width > 0.0 && height > 0.0) {
                bail!("viewport must be positive, got {width}x{height}");
            }
            let viewport = Viewport::new(width, height);
            let mode = if mobile {
                ViewportMode::Constrained
            } else {
                ViewportMode::classify(width, config.mobile_breakpoint)
            };
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let field = layout_for(mode, viewport, &config, &mut rng);
            eprintln!(
                "{:?} field: {} eyes, {} doodles",
                field.mode,
                field.eyes.len(),
                field.doodles.len()
            );
            println!("{}", serde_json::to_string_pretty(&field)?);
        }

        Commands::HostJs { tag, wasm_url, o } => {
            if !tag.contains('-') {
                bail!("custom element names must contain a hyphen: '{tag}'");
            }
            let js = wrap_host_module(&tag, &wasm_url);
            match o {
                Some(out_path) => {
                    fs::write(&out_path, &js)
                        .with_context(|| format!("cannot write '{}'", out_path.display()))?;
                    eprintln!("wrote host module to {} ({} bytes)", out_path.display(), js.len());
                }
                None => print!("{js}"),
            }
        }

        Commands::Serve { port, dry_run, tag, wasm_url } => {
            let mail_to = std::env::var("CONTACT_TO").ok();
            let mut server = ServerConfig::new(port, mail_to.clone().unwrap_or_else(|| "studio@localhost".to_string()));
            if let Ok(from) = std::env::var("CONTACT_FROM") {
                server.mail_from = from;
            }
            server.tag_name = tag;
            server.wasm_url = wasm_url;
            server.narrative = config;

            let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
            if dry_run {
                log::warn!("dry run: submissions are logged, not delivered");
                rt.block_on(run_server(server, LogTransport))?;
            } else {
                let api_key = std::env::var("RESEND_API_KEY")
                    .context("RESEND_API_KEY is not set (use --dry-run to serve without delivery)")?;
                if mail_to.is_none() {
                    bail!("CONTACT_TO is not set");
                }
                let transport = ResendTransport::new(api_key)?;
                rt.block_on(run_server(server, transport))?;
            }
        }
    }

    Ok(())
}
