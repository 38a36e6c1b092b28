//! Kayan Admin CLI
//!
//! Terminal front end for the Kayan Pro admin console.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kayan_admin::config::LoggingConfig;
use kayan_admin::models::{ChatSource, PageContent};
use kayan_admin::pages::{input_region, thread_region};
use kayan_admin::view::regions;
use kayan_admin::{AdminApp, AppError, Config, CredentialPrompt, Credentials, Document, LoadOutcome, Page};

#[derive(Parser)]
#[command(name = "kayan-admin")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Admin console for the Kayan Pro real-estate CMS")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the configured one
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Stats, inboxes and recent activity
    Dashboard,

    /// Units grid
    Units,

    /// Telegram and website inboxes
    Chats {
        #[command(subcommand)]
        command: ChatCommands,
    },

    /// Media library
    Media {
        #[command(subcommand)]
        command: MediaCommands,
    },

    /// CMS pages
    Pages {
        #[command(subcommand)]
        command: PageCommands,
    },

    /// Backend health
    Health,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ChatCommands {
    /// Both inbox lists
    List,
    /// One chat's thread
    Show { source: ChatSource, chat_id: String },
    /// Reply to a chat
    Send {
        source: ChatSource,
        chat_id: String,
        message: String,
    },
}

#[derive(Subcommand)]
enum MediaCommands {
    List,
    /// Upload images one after another
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Subcommand)]
enum PageCommands {
    List,
    /// Save markup and stylesheet under a slug
    Save {
        #[arg(long)]
        slug: String,
        #[arg(long)]
        html: PathBuf,
        #[arg(long)]
        css: Option<PathBuf>,
        /// Palette blocks appended to the markup
        #[arg(long = "block")]
        blocks: Vec<String>,
        /// Publish instead of saving a draft
        #[arg(long)]
        publish: bool,
    },
    /// Render the standalone preview document
    Preview {
        #[arg(long)]
        html: PathBuf,
        #[arg(long)]
        css: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a stored page
    Open { slug: String },
}

/// Username from the command line or an interactive prompt, masked password
struct TerminalPrompt {
    username: Option<String>,
}

impl CredentialPrompt for TerminalPrompt {
    fn credentials(&self) -> Result<Credentials, AppError> {
        let username = match &self.username {
            Some(username) => username.clone(),
            None => dialoguer::Input::<String>::new()
                .with_prompt("Username")
                .interact_text()
                .map_err(|e| AppError::Prompt(e.to_string()))?,
        };
        let password = dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::Prompt(e.to_string()))?;

        Ok(Credentials { username, password })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        match &cli.config {
            Some(path) => Config::load_with_env(path),
            None => Ok(Config::load_default()),
        }
    })?;
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = Some(url);
    }
    init_tracing(&config.logging);

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_deref());
    }

    let app = AdminApp::from_config(&config).await?;
    let prompt = TerminalPrompt { username: None };

    match cli.command {
        Commands::Login { username } => {
            let credentials = TerminalPrompt { username }.credentials()?;
            if !app.login(&credentials.username, &credentials.password).await? {
                bail!("Invalid credentials");
            }
            println!("Logged in as {}", credentials.username);
        }

        Commands::Logout => {
            app.logout().await?;
            println!("Logged out");
        }

        Commands::Dashboard => {
            require(app.start(&prompt).await?)?;
            print_regions(
                &app.document().await,
                &[
                    regions::TOTAL_REVENUE,
                    regions::NEW_LEADS,
                    regions::AVAILABLE_UNITS,
                    regions::ACTIVE_CHATS,
                    regions::TELEGRAM_CHATS,
                    regions::WEBSITE_CHATS,
                    regions::ACTIVITY_LIST,
                ],
            );
        }

        Commands::Units => {
            authenticate(&app, &prompt).await?;
            require(app.navigate(Page::Units).await?)?;
            print_regions(&app.document().await, &[regions::UNITS_GRID]);
        }

        Commands::Chats { command } => {
            authenticate(&app, &prompt).await?;
            run_chats(&app, command).await?;
        }

        Commands::Media { command } => {
            authenticate(&app, &prompt).await?;
            match command {
                MediaCommands::List => require(app.navigate(Page::Media).await?)?,
                MediaCommands::Upload { files } => {
                    require(app.navigate(Page::Media).await?)?;
                    require(app.upload_media(&files).await?)?;
                    println!("Uploaded {} file(s)", files.len());
                }
            }
            print_regions(&app.document().await, &[regions::MEDIA_GRID]);
        }

        Commands::Pages { command } => run_pages(&app, &prompt, command).await?,

        Commands::Health => match app.client().health().await? {
            Some(health) => println!(
                "{} {} {}",
                health.status,
                health.service.unwrap_or_default(),
                health.version.unwrap_or_default()
            ),
            None => bail!("Session expired, run `kayan-admin login`"),
        },

        Commands::Config { .. } => {}
    }

    Ok(())
}

async fn run_chats(app: &AdminApp, command: ChatCommands) -> anyhow::Result<()> {
    require(app.navigate(Page::Chats).await?)?;

    match command {
        ChatCommands::List => {
            print_regions(
                &app.document().await,
                &[regions::TELEGRAM_CHATS, regions::WEBSITE_CHATS],
            );
        }
        ChatCommands::Show { source, chat_id } => {
            require(app.select_chat(source, &chat_id).await?)?;
            print_regions(&app.document().await, &[thread_region(source)]);
        }
        ChatCommands::Send {
            source,
            chat_id,
            message,
        } => {
            require(app.select_chat(source, &chat_id).await?)?;
            app.set_input(input_region(source), message).await;
            if app.send_message(source).await? == LoadOutcome::Skipped {
                bail!("Nothing sent: empty message or unknown chat '{}'", chat_id);
            }
            print_regions(&app.document().await, &[thread_region(source)]);
        }
    }

    Ok(())
}

async fn run_pages(
    app: &AdminApp,
    prompt: &TerminalPrompt,
    command: PageCommands,
) -> anyhow::Result<()> {
    match command {
        PageCommands::List => {
            authenticate(app, prompt).await?;
            let Some(pages) = app.list_pages().await? else {
                bail!("Session expired, run `kayan-admin login`");
            };
            for page in pages {
                let state = if page.is_published { "published" } else { "draft" };
                println!("{}\t{}\t{}", page.slug, state, page.title.unwrap_or_default());
            }
        }

        PageCommands::Save {
            slug,
            html,
            css,
            blocks,
            publish,
        } => {
            authenticate(app, prompt).await?;
            app.navigate(Page::Editor).await?;
            app.edit_page(&read_content(&html, css.as_deref()).await?).await;
            for block in &blocks {
                if !app.drop_block(block).await {
                    bail!("Unknown block '{}'", block);
                }
            }
            app.set_input(regions::PAGE_SELECTOR, slug).await;

            let outcome = if publish {
                app.publish_page().await?
            } else {
                app.save_page().await?
            };
            require(outcome)?;
            for alert in app.document().await.alerts() {
                println!("{}", alert);
            }
        }

        PageCommands::Preview { html, css, output } => {
            app.navigate(Page::Editor).await?;
            app.edit_page(&read_content(&html, css.as_deref()).await?).await;
            let Some(document) = app.preview_page().await? else {
                bail!("Editor is not initialized");
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, document)?;
                    println!("Preview written to {:?}", path);
                }
                None => println!("{}", document),
            }
        }

        PageCommands::Open { slug } => {
            authenticate(app, prompt).await?;
            require(app.open_page(&slug).await?)?;
            if let Some(content) = app.canvas().await {
                println!("{}", content.html);
                if !content.css.is_empty() {
                    println!("<style>{}</style>", content.css);
                }
            }
        }
    }

    Ok(())
}

/// Stderr logger for the config search, before the configured one exists
fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kayan_admin=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kayan_admin={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Log in interactively unless a session is stored
async fn authenticate(app: &AdminApp, prompt: &TerminalPrompt) -> anyhow::Result<()> {
    if app.session().is_authenticated().await {
        return Ok(());
    }
    let credentials = prompt.credentials()?;
    if !app.login(&credentials.username, &credentials.password).await? {
        bail!("Invalid credentials");
    }
    Ok(())
}

fn require(outcome: LoadOutcome) -> anyhow::Result<()> {
    if outcome.is_unauthenticated() {
        bail!("Session expired, run `kayan-admin login`");
    }
    Ok(())
}

async fn read_content(html: &Path, css: Option<&Path>) -> anyhow::Result<PageContent> {
    let html = tokio::fs::read_to_string(html)
        .await
        .with_context(|| format!("reading {:?}", html))?;
    let css = match css {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {:?}", path))?,
        None => String::new(),
    };
    Ok(PageContent { html, css })
}

fn print_regions(doc: &Document, ids: &[&str]) {
    for id in ids {
        let content = doc
            .text(id)
            .or_else(|| doc.html(id))
            .unwrap_or_default();
        println!("== {} ==\n{}", id, content);
    }
}

fn write_default_config(output: Option<&Path>) -> anyhow::Result<()> {
    let config = kayan_admin::config::generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", config),
    }
    Ok(())
}
