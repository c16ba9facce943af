use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use stencil_core::config::{self, CONFIG_FILE_NAME, StencilConfig};
use stencil_core::parse::{self, Document};
use stencil_core::session::Session;
use stencil_core::store::{FileStore, Store};
use stencil_core::template::TemplateEdit;
use stencil_core::worker::{Worker, WorkerRequest};
use stencil_core::{RenderOutput, Selector};

#[derive(Parser)]
#[command(
    name = "stencil",
    about = "Generate request wrappers from a Swagger/OpenAPI schema and a code template",
    version
)]
struct Cli {
    /// Storage file (overrides the config file)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Storage(StorageCommand),

    /// Initialize a new stencil configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Commands that read or write the storage file.
#[derive(Subcommand)]
enum StorageCommand {
    /// Save a Swagger/OpenAPI document as the current schema
    Import {
        /// Path to the schema file (YAML or JSON)
        input: PathBuf,
    },

    /// Render the current schema with the active template
    Render {
        /// Selector of the form `{category}/{operationId}`
        #[arg(short, long, conflicts_with = "url")]
        selector: Option<String>,

        /// Swagger UI page URL; the part after `#/` is used as the selector
        #[arg(short, long)]
        url: Option<String>,

        /// Maximum number of fragments to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage code templates
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Save the number of fragments printed by `render`
    Limit {
        count: usize,
    },

    /// Remove everything from the storage file
    Clear,
}

#[derive(Subcommand)]
enum TemplateAction {
    /// List templates, marking the active one
    List,

    /// Print a template's header and code
    Show {
        /// Template id (defaults to the active template)
        id: Option<String>,
    },

    /// Add a blank template and make it active
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        header_file: Option<PathBuf>,
        #[arg(long)]
        code_file: Option<PathBuf>,
    },

    /// Make a template the active one
    Select { id: String },

    /// Change a template's name, header or code
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        header_file: Option<PathBuf>,
        #[arg(long)]
        code_file: Option<PathBuf>,
    },

    /// Delete a template
    Delete { id: String },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "stencil", &mut std::io::stdout());
            Ok(())
        }

        Commands::Storage(command) => run(command, cli.store),
    }
}

/// Run a command that works on the storage file.
fn run(command: StorageCommand, store_override: Option<PathBuf>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let store_path = store_override.unwrap_or_else(|| PathBuf::from(&cfg.store));
    log::debug!("using storage file {}", store_path.display());
    let mut store = FileStore::new(store_path);

    match command {
        StorageCommand::Import { input } => cmd_import(&mut store, &cfg, &input),

        StorageCommand::Render {
            selector,
            url,
            limit,
            output,
        } => {
            let selector = match (selector, url) {
                (Some(s), _) => Selector::parse(&s),
                (None, Some(u)) => Selector::from_page_url(&u),
                (None, None) => Selector::all(),
            };
            let output = output.or_else(|| cfg.output.as_ref().map(PathBuf::from));
            cmd_render(&store, &cfg, &selector, limit, output.as_deref())
        }

        StorageCommand::Templates { action } => cmd_templates(&mut store, &cfg, action),

        StorageCommand::Limit { count } => {
            let mut session = load_session(&store, &cfg)?;
            session.render_counts = count;
            session.save_render_counts(&mut store)?;
            eprintln!("Render limit set to {count}");
            Ok(())
        }

        StorageCommand::Clear => {
            store.clear()?;
            eprintln!("Cleared {}", store.path().display());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<StencilConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?)
}

fn load_session(store: &dyn Store, cfg: &StencilConfig) -> Result<Session> {
    Session::load_with_limit(store, cfg.render_limit).context("failed to read storage")
}

fn read_document(path: &Path) -> Result<Document> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let document = match ext {
        "yaml" | "yml" => parse::document_from_yaml(&content)?,
        _ => parse::document_from_json(&content)?,
    };
    Ok(document)
}

fn read_optional(path: Option<PathBuf>) -> Result<Option<String>> {
    path.map(|p| {
        fs::read_to_string(&p).with_context(|| format!("failed to read {}", p.display()))
    })
    .transpose()
}

fn cmd_import(store: &mut dyn Store, cfg: &StencilConfig, input: &Path) -> Result<()> {
    let document = read_document(input)?;
    let mut session = load_session(store, cfg)?;

    eprintln!(
        "Imported {}: {} paths, {} operations",
        input.display(),
        document.schema.paths.len(),
        document.schema.operation_count()
    );

    session.set_document(document);
    session.save_schema(store)?;
    Ok(())
}

fn cmd_render(
    store: &dyn Store,
    cfg: &StencilConfig,
    selector: &Selector,
    limit: Option<usize>,
    output: Option<&Path>,
) -> Result<()> {
    let mut session = load_session(store, cfg)?;
    if let Some(limit) = limit {
        session.render_counts = limit;
    }

    let Some(schema) = session.schema.clone() else {
        eprintln!("No schema stored. Run `stencil import <file>` first.");
        return Ok(());
    };

    let template = session.templates.active().clone();
    eprintln!("Template: {} ({})", template.name, template.id);

    let worker = Worker::spawn();
    let result: RenderOutput = worker.request(WorkerRequest::Process {
        schema,
        selector: selector.clone(),
        template,
    })?;

    let text = session.display(&result);
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            fs::write(path, &text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("  wrote {}", path.display());
        }
        None => {
            std::io::stdout()
                .write_all(text.as_bytes())
                .context("failed to write to stdout")?;
        }
    }

    eprintln!(
        "Operations: {} (showing {})",
        result.totals,
        result.totals.min(session.render_counts)
    );
    Ok(())
}

fn cmd_templates(store: &mut dyn Store, cfg: &StencilConfig, action: TemplateAction) -> Result<()> {
    let mut session = load_session(store, cfg)?;

    match action {
        TemplateAction::List => {
            for template in session.templates.iter() {
                let marker = if template.active { "*" } else { " " };
                println!("{marker} {:<12} {}", template.id, template.name);
            }
            return Ok(());
        }

        TemplateAction::Show { id } => {
            let template = match id {
                Some(ref id) => session
                    .templates
                    .get(id)
                    .with_context(|| format!("template not found: {id}"))?,
                None => session.templates.active(),
            };
            println!("# {} ({})", template.name, template.id);
            if let Some(ref header) = template.header {
                println!("## header\n{header}");
            }
            println!("## code\n{}", template.code);
            return Ok(());
        }

        TemplateAction::Add {
            name,
            header_file,
            code_file,
        } => {
            let id = session.templates.add();
            let edit = TemplateEdit {
                name,
                header: read_optional(header_file)?,
                code: read_optional(code_file)?,
            };
            session.templates.update(&id, edit)?;
            eprintln!("Added template {id}");
        }

        TemplateAction::Select { id } => {
            session.templates.select(&id)?;
            eprintln!("Active template: {}", session.templates.active().name);
        }

        TemplateAction::Edit {
            id,
            name,
            header_file,
            code_file,
        } => {
            let edit = TemplateEdit {
                name,
                header: read_optional(header_file)?,
                code: read_optional(code_file)?,
            };
            let template = session.templates.update(&id, edit)?;
            eprintln!("Updated template {}", template.name);
        }

        TemplateAction::Delete { id } => {
            let removed = session.templates.delete(&id)?;
            eprintln!(
                "Deleted template {}; active is now {}",
                removed.name,
                session.templates.active().name
            );
        }
    }

    session.save_templates(store)?;
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
