use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::router::{Resolution, RouteInfo, Router, ANY_METHODS};
use crate::runtime_config::RouterConfig;

/// Command-line interface for rough-router route tables
#[derive(Debug, Parser)]
#[command(name = "rough-routes")]
#[command(about = "Inspect and query rough-router route tables", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log level for diagnostics written to stderr
    #[arg(long, global = true, env = "ROUGH_LOG_LEVEL", default_value = "error")]
    pub log_level: String,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for `list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print every route in a route file
    List {
        /// Path to the TOML route file
        #[arg(short, long)]
        routes: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Resolve one request against a route file
    Lookup {
        /// Path to the TOML route file
        #[arg(short, long)]
        routes: PathBuf,

        /// HTTP method, e.g. GET
        method: String,

        /// Request path, e.g. /users/42
        path: String,

        /// Redirect to the case-insensitive correction when nothing matches
        #[arg(long, default_value_t = false)]
        fix_path: bool,

        /// Value of an X-Forwarded-Prefix header
        #[arg(long)]
        forwarded_prefix: Option<String>,
    },
}

/// One `[[route]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSpec {
    /// HTTP method, or `ANY` for every standard method
    pub method: String,
    pub path: String,
    /// Handler names, outermost first
    pub handlers: Vec<String>,
}

/// A route file: optional `[router]` settings and a list of `[[route]]`s.
///
/// ```toml
/// [router]
/// redirect_fixed_path = true
///
/// [[route]]
/// method = "GET"
/// path = "/users/:id"
/// handlers = ["auth", "show_user"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteFile {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default, rename = "route")]
    pub routes: Vec<RouteSpec>,
}

impl RouteFile {
    /// Parse a route file from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed TOML or unknown keys.
    pub fn parse(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse route file")
    }

    /// Read and parse a route file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read route file {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("Invalid route file {}", path.display()))
    }

    /// Build a router whose handlers are the configured handler names.
    ///
    /// # Errors
    ///
    /// Returns the first registration error, annotated with its route.
    pub fn build_router(&self, config: RouterConfig) -> Result<Router<String>> {
        let mut router = Router::with_config(config);
        for route in &self.routes {
            let methods: Vec<&str> = if route.method.eq_ignore_ascii_case("ANY") {
                ANY_METHODS.to_vec()
            } else {
                vec![route.method.as_str()]
            };
            for method in methods {
                router
                    .add_route(method, &route.path, route.handlers.clone())
                    .with_context(|| format!("Failed to register {method} {}", route.path))?;
            }
        }
        info!(
            routes = self.routes.len(),
            max_params = router.max_params(),
            "Route table loaded"
        );
        Ok(router)
    }
}

/// Render the route table.
///
/// # Errors
///
/// Fails only if serialisation or formatting fails.
pub fn render_routes(routes: &[RouteInfo], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(routes).context("Failed to serialise routes")
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for route in routes {
                writeln!(
                    out,
                    "{:<8} {} ({} handler{})",
                    route.method,
                    route.path,
                    route.handler_count,
                    if route.handler_count == 1 { "" } else { "s" }
                )?;
            }
            Ok(out)
        }
    }
}

/// Render the outcome of resolving one request.
///
/// # Errors
///
/// Fails only if formatting fails.
pub fn render_resolution(resolution: &Resolution<'_, String>) -> Result<String> {
    let mut out = String::new();
    match resolution {
        Resolution::Matched(lookup) => {
            let handlers = lookup
                .handlers
                .map(|chain| chain.join(" -> "))
                .unwrap_or_default();
            writeln!(
                out,
                "matched {} [{handlers}]",
                lookup.full_path.unwrap_or_default()
            )?;
            for (name, value) in lookup.params.iter() {
                writeln!(out, "  {name} = {value}")?;
            }
        }
        Resolution::Redirect { location, status } => {
            writeln!(out, "redirect {} {location}", status.as_u16())?;
        }
        Resolution::NotFound => {
            writeln!(out, "not found")?;
        }
    }
    Ok(out)
}

/// Run a parsed command line, writing results to stdout.
///
/// # Errors
///
/// Returns an error for unreadable or invalid route files.
pub fn run_cli(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::List { routes, format } => {
            let file = RouteFile::load(routes)?;
            let router = file.build_router(file.router)?;
            print!("{}", render_routes(&router.routes(), *format)?);
        }
        Commands::Lookup {
            routes,
            method,
            path,
            fix_path,
            forwarded_prefix,
        } => {
            if !path.starts_with('/') {
                bail!("request path must begin with '/': {path}");
            }
            let file = RouteFile::load(routes)?;
            let mut config = file.router;
            if *fix_path {
                config.redirect_fixed_path = true;
            }
            let router = file.build_router(config)?;
            let resolution =
                router.resolve(&method.to_ascii_uppercase(), path, forwarded_prefix.as_deref());
            print!("{}", render_resolution(&resolution)?);
        }
    }
    Ok(())
}
