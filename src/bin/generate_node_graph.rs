//! Generate the node graph for one catalog resource
//!
//! Reads an EventCatalog directory, builds the requested graph and prints it
//! as JSON on stdout, or writes it to `--out`.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use eventcatalog_graph::{FileCatalog, Focus, GraphConfig, GraphEngine, GraphKind, MessageKind};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "generate-node-graph", version, about = "Derive the node graph around a catalog resource")]
struct Args {
    /// Catalog root directory
    catalog: PathBuf,

    /// Which graph to build
    #[arg(value_enum)]
    kind: Kind,

    /// Id of the focus resource
    id: String,

    /// Version or range of the focus resource (default: latest)
    #[arg(long, value_name = "VERSION")]
    focus_version: Option<String>,

    /// Message collection to look in when an id is shared across kinds
    #[arg(long, value_enum)]
    message_kind: Option<MessageType>,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep builder positions instead of running a layout
    #[arg(long)]
    no_layout: bool,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,

    /// Write the graph here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Kind {
    Message,
    Service,
    Domain,
    Container,
    DataProduct,
    DomainEntities,
    ServiceEntities,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum MessageType {
    Event,
    Command,
    Query,
}

impl From<MessageType> for MessageKind {
    fn from(kind: MessageType) -> Self {
        match kind {
            MessageType::Event => MessageKind::Event,
            MessageType::Command => MessageKind::Command,
            MessageType::Query => MessageKind::Query,
        }
    }
}

impl Args {
    fn focus(&self) -> Focus {
        let focus = match &self.focus_version {
            Some(version) => Focus::versioned(&self.id, version),
            None => Focus::new(&self.id),
        };
        match self.message_kind {
            Some(kind) => focus.with_kind(kind.into()),
            None => focus,
        }
    }
}

impl From<Kind> for GraphKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Message => GraphKind::Message,
            Kind::Service => GraphKind::Service,
            Kind::Domain => GraphKind::Domain,
            Kind::Container => GraphKind::Container,
            Kind::DataProduct => GraphKind::DataProduct,
            Kind::DomainEntities => GraphKind::DomainEntities,
            Kind::ServiceEntities => GraphKind::ServiceEntities,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GraphConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => GraphConfig::default(),
    };

    let mut engine = GraphEngine::with_config(FileCatalog::new(&args.catalog), config);
    if args.no_layout {
        engine = engine.without_layout();
    }

    let focus = args.focus();
    let kind = GraphKind::from(args.kind);

    let graph = engine
        .build(kind, &focus)
        .await
        .with_context(|| format!("building {kind} graph from {}", args.catalog.display()))?;

    if graph.is_empty() {
        tracing::warn!(focus = %focus.id, %kind, "focus resource not found, graph is empty");
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&graph)?
    } else {
        serde_json::to_string(&graph)?
    };

    match &args.out {
        Some(path) => fs::write(path, json).with_context(|| format!("writing {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}
