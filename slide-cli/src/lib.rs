//! # Saorsa Slides CLI
//!
//! Command-line host for the slide engine.
//!
//! ## Commands
//!
//! - `templates` - list the built-in templates
//! - `instantiate` - copy a template into a new slide with fresh ids
//! - `render` - export a slide or template to SVG, PNG or JPEG
//! - `replay` - drive a slide through a recorded event log and print the result
//!
//! Every command that reads a slide accepts either `--input <slide.json>` or
//! `--template <id>`. A JSON [`CanvasConfig`] can be supplied with `--config`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use slide_core::{
    builtin_templates, find_template, CanvasConfig, CanvasEvent, IdGenerator,
    SequentialIdGenerator, SessionState, Slide, SlideCanvas, TimestampIdGenerator,
};
use slide_renderer::{ExportConfig, ExportFormat, SlideExporter};

/// Command-line arguments for the `slide` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "slide")]
#[command(about = "Saorsa Slides: template instantiation, slide export and gesture replay")]
#[command(version)]
pub struct CliArgs {
    /// JSON canvas configuration file
    #[arg(long, global = true, env = "SLIDE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List built-in templates
    Templates,

    /// Instantiate a template as a new slide (JSON)
    Instantiate {
        /// Template id
        template: String,
        /// Salt for deterministic ids; timestamp-based ids when omitted
        #[arg(long, env = "SLIDE_ID_SEED")]
        seed: Option<String>,
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Export a slide to an image
    Render {
        /// Slide to render
        #[command(flatten)]
        source: SlideSource,
        /// Output file
        #[arg(long, short)]
        output: PathBuf,
        /// Output format (guessed from the output extension when omitted)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// Output pixels per slide unit
        #[arg(long, default_value = "1.0", env = "SLIDE_EXPORT_SCALE")]
        scale: f32,
        /// Background colour overriding the slide's own
        #[arg(long)]
        background: Option<String>,
        /// JPEG quality (1-100)
        #[arg(long, default_value = "85", value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,
    },

    /// Replay a JSON array of canvas events against a slide
    Replay {
        /// Slide to drive
        #[command(flatten)]
        source: SlideSource,
        /// Event log (JSON array of canvas events)
        #[arg(long)]
        events: PathBuf,
        /// Measured viewport width delivered before the first event
        #[arg(long)]
        viewport_width: Option<f64>,
        /// Output file for the resulting slide (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Where a slide comes from.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct SlideSource {
    /// Slide JSON file
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Built-in template id
    #[arg(long)]
    pub template: Option<String>,
}

/// Export format selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// PNG image
    Png,
    /// JPEG image
    Jpeg,
    /// SVG document
    Svg,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => Self::Png,
            FormatArg::Jpeg => Self::Jpeg,
            FormatArg::Svg => Self::Svg,
        }
    }
}

impl SlideSource {
    /// Load the slide.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the
    /// template is unknown.
    pub fn load(&self) -> anyhow::Result<Slide> {
        match (&self.input, &self.template) {
            (Some(path), _) => read_slide(path),
            (None, Some(id)) => {
                let template = find_template(id)?;
                Ok(template.instantiate(&mut TimestampIdGenerator::new()))
            }
            (None, None) => bail!("either --input or --template is required"),
        }
    }
}

/// Read a slide from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a slide.
pub fn read_slide(path: &Path) -> anyhow::Result<Slide> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read slide {}", path.display()))?;
    Slide::from_json(&json).with_context(|| format!("Invalid slide JSON in {}", path.display()))
}

/// Load the canvas configuration, falling back to defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<CanvasConfig> {
    let Some(path) = path else {
        return Ok(CanvasConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = CanvasConfig::from_json(&json)
        .with_context(|| format!("Invalid config JSON in {}", path.display()))?;
    tracing::debug!("Loaded canvas config from {}", path.display());
    Ok(config)
}

/// Run a parsed command, writing textual output to `out`.
///
/// # Errors
///
/// Returns an error if any input cannot be loaded or output cannot be
/// written.
pub fn run(args: CliArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    match args.command {
        Command::Templates => {
            for template in builtin_templates() {
                writeln!(
                    out,
                    "{:<20} {} ({} elements)",
                    template.id,
                    template.name,
                    template.slide.element_count()
                )?;
            }
        }
        Command::Instantiate {
            template,
            seed,
            output,
        } => {
            let template = find_template(&template)?;
            let mut ids: Box<dyn IdGenerator> = match seed {
                Some(seed) => Box::new(SequentialIdGenerator::new(seed)),
                None => Box::new(TimestampIdGenerator::new()),
            };
            let slide = template.instantiate(ids.as_mut());
            tracing::info!("Instantiated template {} as slide {}", template.id, slide.id);
            emit(&slide.to_json()?, output.as_deref(), out)?;
        }
        Command::Render {
            source,
            output,
            format,
            scale,
            background,
            quality,
        } => {
            let slide = source.load()?;
            let format = match format {
                Some(f) => f.into(),
                None => output
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(ExportFormat::from_extension)
                    .with_context(|| {
                        format!("Cannot infer format from {}; pass --format", output.display())
                    })?,
            };
            let exporter = SlideExporter::new(ExportConfig {
                scale,
                background,
                jpeg_quality: quality,
            });
            let bytes = exporter
                .export(&slide, format)
                .with_context(|| format!("Failed to export slide {}", slide.id))?;
            std::fs::write(&output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!(
                "Wrote {} ({} bytes, {})",
                output.display(),
                bytes.len(),
                format.extension()
            );
        }
        Command::Replay {
            source,
            events,
            viewport_width,
            output,
        } => {
            let config = load_config(args.config.as_deref())?;
            let slide = source.load()?;
            let log = std::fs::read_to_string(&events)
                .with_context(|| format!("Failed to read events {}", events.display()))?;
            let events: Vec<CanvasEvent> = serde_json::from_str(&log)
                .with_context(|| format!("Invalid event log {}", events.display()))?;

            let (slide, session) = replay(slide, config, viewport_width, events);
            tracing::info!(
                "Replay finished with {} commits and {} text updates",
                session.commits().len(),
                session.updates().len()
            );
            emit(&slide.to_json()?, output.as_deref(), out)?;
        }
    }
    Ok(())
}

/// Drive a slide through `events` and return the committed slide and the
/// session that observed it.
#[must_use]
pub fn replay(
    slide: Slide,
    config: CanvasConfig,
    viewport_width: Option<f64>,
    events: Vec<CanvasEvent>,
) -> (Slide, SessionState) {
    let mut canvas = SlideCanvas::new(slide, SessionState::new(), config);
    if viewport_width.is_some() {
        canvas.dispatch(CanvasEvent::ViewportResized {
            width: viewport_width,
            origin: slide_core::Point::default(),
        });
    }
    let count = events.len();
    for event in events {
        canvas.dispatch(event);
    }
    tracing::debug!("Replayed {count} events, final state {}", canvas.gesture().name());
    canvas.into_parts()
}

fn emit(text: &str, path: Option<&Path>, out: &mut dyn Write) -> anyhow::Result<()> {
    match path {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => writeln!(out, "{text}")?,
    }
    Ok(())
}
