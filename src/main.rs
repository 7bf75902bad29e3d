//! mindpalette - interactive text-to-image gallery session

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mindpalette::config::{Config, ConfigOptions, DEFAULT_API_BASE_URL};
use mindpalette::enhancer::{CompletionServer, PromptEnhancer};
use mindpalette::service::GenerationParams;
use mindpalette::session::image_session::DEFAULT_VARIATION_COUNT;
use mindpalette::session::{ImageSession, UPSCALE_TARGET};
use mindpalette::style::ArtStyle;

/// Default prompt shown at session start.
const DEFAULT_PROMPT: &str = "Batman standing on Gotham City rooftop, cinematic";

/// Default enhancer idea.
const DEFAULT_IDEA: &str = "boy studying at desk";

#[derive(Parser, Debug)]
#[command(name = "mindpalette")]
#[command(about = "Interactive text-to-image gallery session")]
struct Args {
    /// Stability API key (falls back to STABILITY_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Stability API base URL
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    base_url: String,

    /// Generation engine
    #[arg(long)]
    engine: Option<String>,

    /// Remote call timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Base URL of the local text-generation server for prompt enhancement
    #[arg(long)]
    enhancer_url: Option<String>,

    /// Generated image width
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Generated image height
    #[arg(long, default_value_t = 1024)]
    height: u32,

    /// Art style suffix applied to prompts
    #[arg(long, value_enum, default_value_t = ArtStyle::None)]
    style: ArtStyle,
}

/// Mutable per-session UI state: the active style and the stored suggestion.
struct Ui {
    style: ArtStyle,
    enhanced_prompt: Option<String>,
    params: GenerationParams,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = Config::new(
        args.base_url,
        ConfigOptions {
            api_key: args.api_key,
            engine: args.engine,
            request_timeout_secs: args.timeout,
            enhancer_base_url: args.enhancer_url,
        },
    )?;

    if config.api_key.is_none() {
        warn!("No Stability API key configured; generate will fail until one is set");
    }

    let mut session = ImageSession::new(config.clone())?;
    let mut ui = Ui {
        style: args.style,
        enhanced_prompt: None,
        params: GenerationParams {
            width: args.width,
            height: args.height,
        },
    };

    println!("MindPalette - AI image gallery session");
    println!("Default prompt: {}", DEFAULT_PROMPT);
    println!("Type 'help' for commands, 'quit' to exit.");

    run_repl(&mut session, &mut ui, config).await
}

async fn run_repl(session: &mut ImageSession, ui: &mut Ui, config: Arc<Config>) -> Result<()> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "quit" | "exit" => break,
            "help" => print_help(),
            "style" => {
                ui.style = ArtStyle::from_name(rest);
                println!("Style: {}", ui.style);
            }
            "generate" => {
                let base = if rest.is_empty() {
                    ui.enhanced_prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
                } else {
                    rest
                };
                let prompt = ui.style.apply(base);
                println!("Generating...");
                match session.generate(&prompt, ui.params).await {
                    Ok(image) => println!(
                        "Done: {}x{} ({} in gallery)",
                        image.width(),
                        image.height(),
                        session.gallery().len()
                    ),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            "variations" => {
                if !session.has_image() {
                    println!("Generate an image first.");
                    continue;
                }
                let count: usize = rest.parse().unwrap_or(DEFAULT_VARIATION_COUNT);
                let base = ui.enhanced_prompt.as_deref().unwrap_or(DEFAULT_PROMPT);
                let prompt = ui.style.apply(base);
                println!("Making {} variations...", count);
                for result in session.variations(&prompt, count).await {
                    match result {
                        Ok(_) => println!("Variation ready"),
                        Err(e) => eprintln!("Variation failed: {}", e),
                    }
                }
            }
            "upscale" => match session.upscale(UPSCALE_TARGET) {
                Some(image) => println!("Upscaled to {}x{}", image.width(), image.height()),
                None => println!("Generate an image first."),
            },
            "enhance" => {
                let idea = if rest.is_empty() { DEFAULT_IDEA } else { rest };
                let suggestion = enhance_idea(&config, idea).await;
                println!("Suggested: {}", suggestion);
                ui.enhanced_prompt = Some(suggestion);
            }
            "gallery" => {
                if session.gallery().is_empty() {
                    println!("Gallery is empty.");
                }
                for (i, entry) in session.gallery().iter().enumerate() {
                    println!(
                        "{}. {} ({}) - {}x{}",
                        i + 1,
                        entry.prompt,
                        entry.time_label(),
                        entry.image.width(),
                        entry.image.height()
                    );
                }
            }
            "save" => match parse_save_args(rest) {
                Some((index, path)) => match session.export_one(index - 1) {
                    Ok(bytes) => {
                        std::fs::write(&path, bytes)?;
                        println!("Saved entry {} to {}", index, path);
                    }
                    Err(e) => eprintln!("Error: {}", e),
                },
                None => println!("Usage: save <entry> <path>"),
            },
            "export" => {
                if rest.is_empty() {
                    println!("Usage: export <path>");
                    continue;
                }
                match session.export_all() {
                    Ok(bytes) => {
                        std::fs::write(rest, bytes)?;
                        println!(
                            "Exported {} images to {}",
                            session.gallery().len(),
                            rest
                        );
                    }
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            other => println!("Unknown command '{}'; type 'help'.", other),
        }
    }

    Ok(())
}

/// Run the enhancer, falling back to the raw idea when the model is
/// unavailable or the best-effort trim comes back empty.
async fn enhance_idea(config: &Config, idea: &str) -> String {
    let enhancer = match CompletionServer::new(&config.enhancer_base_url) {
        Ok(model) => PromptEnhancer::new(Box::new(model)),
        Err(e) => {
            eprintln!("Enhancer unavailable ({}); using the raw idea", e);
            return idea.to_string();
        }
    };

    match enhancer.enhance(idea).await {
        Ok(suggestion) if !suggestion.is_empty() => suggestion,
        Ok(_) => idea.to_string(),
        Err(e) => {
            eprintln!("Enhancer unavailable ({}); using the raw idea", e);
            idea.to_string()
        }
    }
}

fn parse_save_args(rest: &str) -> Option<(usize, String)> {
    let (index, path) = rest.split_once(char::is_whitespace)?;
    let index: usize = index.trim().parse().ok()?;
    if index == 0 || path.trim().is_empty() {
        return None;
    }
    Some((index, path.trim().to_string()))
}

fn print_help() {
    println!("Commands:");
    println!("  generate [prompt]    generate an image (uses the stored suggestion or the default prompt)");
    println!("  variations [count]   generate independent variations of the current prompt");
    println!("  upscale              upscale the latest image to 2048x2048 locally");
    println!("  enhance [idea]       ask the local model for an improved prompt");
    println!("  style <name>         set the art style suffix (None, Anime, Cyberpunk, ...)");
    println!("  gallery              list gallery entries");
    println!("  save <entry> <path>  write one entry as PNG");
    println!("  export <path>        write the whole gallery as a ZIP");
    println!("  quit                 end the session (gallery is discarded)");
}
