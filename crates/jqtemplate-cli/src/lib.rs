//! # jqtemplate CLI
//!
//! Renders the directive templates found in an HTML document against a JSON
//! model and prints the resulting markup.
//!
//! ```text
//! jqtemplate render page.html --template '#row' --model data.json --root '#table'
//! jqtemplate check page.html --template 'template > *'
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use jqtemplate::{Context, Document, Engine, RenderOptions};
use tracing::info;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "jqtemplate")]
#[command(version, about = "Render jqtemplate directives in HTML documents", long_about = None)]
pub struct Cli {
    /// Log compilation and evaluation at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render templates and print the document
    Render {
        /// HTML document holding the templates
        document: PathBuf,

        /// Selector for the template fragments
        #[arg(short, long)]
        template: String,

        /// JSON object used as the render context
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Selector for the element that receives rendered instances
        #[arg(long)]
        root: Option<String>,

        /// Evaluate the fragments themselves instead of clones
        #[arg(long)]
        inplace: bool,

        /// JSON file with render options (`inplace`, `root`)
        #[arg(long)]
        options: Option<PathBuf>,

        /// Write output to FILE instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print only the rendered instances
        #[arg(long)]
        fragment: bool,
    },

    /// Compile templates and report the number of directives
    Check {
        /// HTML document holding the templates
        document: PathBuf,

        /// Selector for the template fragments
        #[arg(short, long)]
        template: String,
    },
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Render `template` in `markup` and serialize the result.
///
/// With `fragment`, only the rendered instances are returned, one per line;
/// otherwise the whole document.
pub fn render(
    markup: &str,
    template: &str,
    model: serde_json::Value,
    options: &RenderOptions,
    fragment: bool,
) -> Result<String> {
    let mut doc = Document::parse(markup).context("failed to parse document")?;
    let template = Engine::new().template(&doc, template)?;
    let mut ctx = Context::from_json(model)?;
    let instances = template.render(&mut doc, &mut ctx, options)?;
    info!(instances = instances.len(), "render complete");

    if fragment {
        Ok(instances
            .iter()
            .map(|node| doc.outer_html(*node))
            .collect::<Vec<_>>()
            .join("\n"))
    } else {
        Ok(doc.to_html())
    }
}

/// Compile `template` in `markup` and count its directives.
pub fn check(markup: &str, template: &str) -> Result<usize> {
    let doc = Document::parse(markup).context("failed to parse document")?;
    let template = Engine::new().template(&doc, template)?;
    template.compile(&doc)?;
    Ok(template.directive_count())
}

/// Merge the options file with command-line overrides.
pub fn load_options(
    file: Option<&Path>,
    root: Option<&str>,
    inplace: bool,
) -> Result<RenderOptions> {
    let mut options = match file {
        Some(path) => serde_json::from_str(&read(path)?)
            .with_context(|| format!("invalid render options in {}", path.display()))?,
        None => RenderOptions::default(),
    };
    if let Some(root) = root {
        options = options.root(root);
    }
    if inplace {
        options = options.inplace(true);
    }
    Ok(options)
}

/// Execute a parsed command line.
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Render {
            document,
            template,
            model,
            root,
            inplace,
            options,
            output,
            fragment,
        } => {
            let markup = read(document)?;
            let model = match model {
                Some(path) => serde_json::from_str(&read(path)?)
                    .with_context(|| format!("invalid JSON in {}", path.display()))?,
                None => serde_json::Value::Null,
            };
            let options = load_options(options.as_deref(), root.as_deref(), *inplace)?;
            let html = render(&markup, template, model, &options, *fragment)
                .with_context(|| format!("failed to render {}", document.display()))?;
            match output {
                Some(path) => fs::write(path, html)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{}", html),
            }
        }
        Command::Check { document, template } => {
            let markup = read(document)?;
            let count = check(&markup, template)
                .with_context(|| format!("failed to compile {}", document.display()))?;
            println!("{}: {} directive(s) compiled", document.display(), count);
        }
    }
    Ok(())
}
