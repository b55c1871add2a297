//! pscc-drv - compiler driver.
//!
//! One program per run: `pscc compile <path>` writes NASM assembly to
//! standard output. The driver's job stops at orchestration — it never
//! lexes, parses, or type-checks anything itself; it owns a [`SourceMap`]
//! and a [`Handler`], hands the source text to [`pscc_par::Parser`], and
//! passes the resulting AST and type table to [`pscc_gen::generate`].
//!
//! With exactly one positional argument and one boolean flag, a
//! general-purpose argument parser is more machinery than the surface
//! warrants; [`Config`] is built by hand from `std::env::args()` instead.

use std::path::PathBuf;

use anyhow::{bail, Context};
use pscc_util::{Handler, SourceMap};

/// Parsed command-line invocation: `pscc compile <path> [-d]`.
#[derive(Debug, Clone)]
pub struct Config {
    pub path: PathBuf,
    pub debug: bool,
}

impl Config {
    /// Parses `pscc compile <path> [-d]` out of a raw argument list (the
    /// program name already stripped, as `std::env::args().skip(1)` does).
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut args = args.into_iter();
        let first = args.next().context("usage: pscc compile <path> [-d]")?;
        if first != "compile" {
            bail!("unknown command '{first}', expected 'compile'");
        }

        let mut path = None;
        let mut debug = false;
        for arg in args {
            if arg == "-d" {
                debug = true;
            } else if path.is_none() {
                path = Some(PathBuf::from(arg));
            } else {
                bail!("unexpected argument '{arg}'");
            }
        }

        let path = path.context("usage: pscc compile <path> [-d]")?;
        Ok(Config { path, debug })
    }

    /// Builds a `Config` from the real process arguments.
    pub fn from_env() -> anyhow::Result<Self> {
        Config::parse(std::env::args().skip(1))
    }
}

/// One compilation run: owns the source map and diagnostic handler for
/// the lifetime of the pipeline.
pub struct Session {
    pub config: Config,
    pub sources: SourceMap,
    pub handler: Handler,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Session { config, sources: SourceMap::new(), handler: Handler::new() }
    }

    /// Runs the full pipeline and returns the emitted assembly text.
    ///
    /// Diagnostics collected along the way live in `self.handler`; the
    /// caller decides what exit status they warrant (see [`main`]).
    pub fn compile(&mut self) -> anyhow::Result<String> {
        let content = std::fs::read_to_string(&self.config.path)
            .with_context(|| format!("could not read '{}'", self.config.path.display()))?;

        tracing::debug!(path = %self.config.path.display(), "source file read");
        self.sources.add_file(self.config.path.display().to_string(), content.clone());

        let mut parser = pscc_par::Parser::new(&content, &mut self.handler);
        let program = parser.parse_program();
        tracing::debug!("parse complete");

        for diag in self.handler.diagnostics() {
            self.report(&diag);
        }

        let asm = pscc_gen::generate(&program, &parser.sema.types, self.config.debug)
            .context("code generation failed")?;
        tracing::debug!(lines = asm.lines().count(), "codegen complete");

        Ok(asm)
    }

    /// Prints one collected diagnostic to stderr, with source context
    /// when the span resolves against the source map.
    fn report(&self, diag: &pscc_util::Diagnostic) {
        if let Some(rendered) = self.sources.format_span(diag.span) {
            eprintln!("{}: {}\n{}", diag.level, diag.message, rendered);
        } else {
            eprintln!("{}: {}", diag.level, diag.message);
        }
    }
}

/// Entry point called from `main.rs`.
pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let debug = config.debug;
    let mut session = Session::new(config);
    let asm = session.compile()?;

    print!("{asm}");

    if session.handler.has_errors() {
        if debug {
            tracing::debug!(errors = session.handler.error_count(), "finished with diagnostics");
        }
        std::process::exit(1);
    }

    Ok(())
}
