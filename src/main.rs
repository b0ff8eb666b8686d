//! Blockprint CLI
//!
//! Usage:
//!   blockprint render <TEMPLATE> [--values FILE] [--theme FILE] [--fill] [--fragment] [--output FILE]
//!   blockprint bindings <TEMPLATE> <FIELD>
//!   blockprint check <TEMPLATE> [--values FILE]
//!
//! Set RUST_LOG (e.g. `RUST_LOG=blockprint=debug`) for engine logs on stderr.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blockprint::scope::check_values;
use blockprint::template::load_values;
use blockprint::{
    render_with_config, MarkupConfig, RenderConfig, RenderMode, TemplateDocument, Theme, ValueObject,
};

#[derive(Parser)]
#[command(name = "blockprint")]
#[command(about = "Render and inspect template documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template to HTML
    Render {
        /// Template document (JSON)
        template: PathBuf,

        /// Field values (JSON)
        #[arg(short, long)]
        values: Option<PathBuf>,

        /// Theme overriding the template's own (TOML)
        #[arg(short, long)]
        theme: Option<PathBuf>,

        /// Expand repeats with the given values instead of showing placeholders
        #[arg(short, long)]
        fill: bool,

        /// Emit only the page markup, without the surrounding HTML document
        #[arg(long)]
        fragment: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the nodes bound to a field
    Bindings {
        /// Template document (JSON)
        template: PathBuf,

        /// Field id
        field: String,
    },

    /// Report dangling bindings and value problems
    Check {
        /// Template document (JSON)
        template: PathBuf,

        /// Field values (JSON)
        #[arg(short, long)]
        values: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blockprint=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            template,
            values,
            theme,
            fill,
            fragment,
            output,
        } => {
            let template = read_template(&template);
            let values = read_values(values.as_deref());

            let mut config = RenderConfig::new()
                .with_mode(if fill { RenderMode::Fill } else { RenderMode::Preview })
                .with_markup(MarkupConfig::default().with_standalone(!fragment));
            if let Some(path) = &theme {
                match Theme::from_file(path) {
                    Ok(theme) => config = config.with_theme(theme),
                    Err(e) => fail(&format!("Error loading theme '{}': {}", path.display(), e)),
                }
            }

            let doc = render_with_config(&template, &values, &config);
            match &output {
                Some(path) => {
                    if let Err(e) = fs::write(path, &doc.markup) {
                        fail(&format!("Error writing '{}': {}", path.display(), e));
                    }
                }
                None => println!("{}", doc.markup),
            }
        }
        Commands::Bindings { template, field } => {
            let template = read_template(&template);
            if !template.fields().contains(&field) {
                tracing::warn!(field = %field, "field is not defined in the template");
            }
            for node_id in template.check_in_use(&field) {
                println!("{}", node_id);
            }
        }
        Commands::Check { template, values } => {
            let template = read_template(&template);
            let values = read_values(values.as_deref());

            let warnings = template.validate();
            let issues = check_values(template.fields(), template.root(), &values);
            for warning in &warnings {
                println!("warning: {}", warning);
            }
            for issue in &issues {
                println!("value: {}", issue);
            }
            if !warnings.is_empty() || !issues.is_empty() {
                std::process::exit(1);
            }
        }
    }
}

fn read_template(path: &Path) -> TemplateDocument {
    match TemplateDocument::from_file(path) {
        Ok(template) => template,
        Err(e) => fail(&format!("Error loading template '{}': {}", path.display(), e)),
    }
}

fn read_values(path: Option<&Path>) -> ValueObject {
    let Some(path) = path else {
        return ValueObject::new();
    };
    match load_values(path) {
        Ok(values) => values,
        Err(e) => fail(&format!("Error loading values '{}': {}", path.display(), e)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
