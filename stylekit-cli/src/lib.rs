//! # Stylekit CLI
//!
//! Renders node JSON files through the style engine for inspection and
//! snapshotting.
//!
//! ## Usage
//!
//! ```bash
//! stylekit --input node.json --breakpoint tablet
//! stylekit --input page.json --scope '#module-1' --format json
//! stylekit --input node.json --schemas extra-schemas.json --config render.json
//! ```
//!
//! The input holds either one node object or an array of nodes.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use stylekit_core::{Breakpoint, Document, Node, RenderConfig, RenderedNode, SchemaRegistry};

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable inline style and stylesheet.
    #[default]
    Text,
    /// Rendered nodes as pretty JSON.
    Json,
}

/// Command-line arguments for stylekit.
#[derive(Debug, Clone, Parser)]
#[command(name = "stylekit")]
#[command(about = "Render page-builder nodes to inline styles and scoped stylesheets")]
#[command(version)]
pub struct CliArgs {
    /// Node JSON file (one node or an array of nodes)
    #[arg(long, short)]
    pub input: PathBuf,

    /// Breakpoint to render at (desktop, tablet, mobile)
    #[arg(long, short, env = "STYLEKIT_BREAKPOINT", default_value = "desktop")]
    pub breakpoint: Breakpoint,

    /// Selector prefixed to element rules
    #[arg(long, env = "STYLEKIT_SCOPE")]
    pub scope: Option<String>,

    /// Extra element schemas (JSON array), added over the built-in ones
    #[arg(long)]
    pub schemas: Option<PathBuf>,

    /// Render options (JSON), flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Node file.
    pub input: PathBuf,
    /// Breakpoint to render at.
    pub breakpoint: Breakpoint,
    /// Render options.
    pub render: RenderConfig,
    /// Schema registry with any extra schemas applied.
    pub registry: SchemaRegistry,
    /// Output format.
    pub format: OutputFormat,
}

impl CliConfig {
    /// Build the configuration from arguments, reading the optional
    /// schema and render config files.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced file cannot be read or parsed.
    pub fn from_args(args: &CliArgs) -> anyhow::Result<Self> {
        let mut render = match &args.config {
            Some(path) => serde_json::from_str(&read(path)?)
                .with_context(|| format!("invalid render config in {}", path.display()))?,
            None => RenderConfig::default(),
        };
        if let Some(scope) = &args.scope {
            render.scope.clone_from(scope);
        }

        let mut registry = SchemaRegistry::builtin();
        if let Some(path) = &args.schemas {
            let added = registry
                .extend_from_json(&read(path)?)
                .with_context(|| format!("invalid element schemas in {}", path.display()))?;
            tracing::info!(count = added, path = %path.display(), "loaded element schemas");
        }

        Ok(Self {
            input: args.input.clone(),
            breakpoint: args.breakpoint,
            render,
            registry,
            format: args.format,
        })
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NodeInput {
    One(Box<Node>),
    Many(Vec<Node>),
}

/// Load the nodes of an input file into a document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold nodes.
pub fn load_document(path: &Path) -> anyhow::Result<Document> {
    let input: NodeInput = serde_json::from_str(&read(path)?)
        .with_context(|| format!("{} does not contain a node or node array", path.display()))?;
    let document: Document = match input {
        NodeInput::One(node) => std::iter::once(*node).collect(),
        NodeInput::Many(nodes) => nodes.into_iter().collect(),
    };
    tracing::debug!(nodes = document.len(), "loaded document");
    Ok(document)
}

fn format_text(rendered: &[RenderedNode], module_types: &[&str]) -> String {
    let mut out = String::new();
    for (node, module_type) in rendered.iter().zip(module_types) {
        out.push_str(&format!(
            "/* {module_type} {} @ {} */\n",
            node.node_id, node.breakpoint
        ));
        out.push_str(&format!("style=\"{}\"\n", node.inline_style));
        if let Some(id) = &node.css_id {
            out.push_str(&format!("id=\"{id}\"\n"));
        }
        if !node.css_classes.is_empty() {
            out.push_str(&format!("class=\"{}\"\n", node.css_classes.join(" ")));
        }
        out.push_str(&node.stylesheet);
        if let Some(css) = &node.custom_css {
            out.push_str(css);
            out.push('\n');
        }
    }
    out
}

/// Render the input described by `args`.
///
/// # Errors
///
/// Returns an error if any input file is unreadable or malformed.
pub fn run(args: &CliArgs) -> anyhow::Result<String> {
    let config = CliConfig::from_args(args)?;
    let document = load_document(&config.input)?;
    let rendered = document.render_all(config.breakpoint, &config.registry, &config.render);

    match config.format {
        OutputFormat::Text => {
            let module_types: Vec<&str> =
                document.nodes().map(|n| n.module_type.as_str()).collect();
            Ok(format_text(&rendered, &module_types))
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(&rendered).context("failed to encode rendered nodes")
        }
    }
}
