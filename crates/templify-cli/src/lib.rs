//! Command-line front end for templify.
//!
//! The binary is a thin wrapper around [`execute`], which loads the context,
//! renders with the chosen missing-key policy and returns the output text.

pub mod cli;
pub mod input;
pub mod logging;

use anyhow::{Context, Result};
use templify::Renderer;

use cli::{Command, CommonArgs};

impl Command {
    /// Arguments shared by every subcommand.
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::RenderText { common, .. }
            | Command::RenderData { common, .. }
            | Command::RenderJinja { common, .. } => common,
        }
    }
}

/// Runs a subcommand and returns the rendered output.
pub fn execute(command: &Command) -> Result<String> {
    let common = command.common();
    let context = input::load_context(common.context.as_deref())?;
    let renderer = Renderer::new().missing(common.missing);

    match command {
        Command::RenderText { template, .. } => {
            tracing::debug!(policy = %renderer.options().policy, "rendering text");
            let mut out = renderer.render_text(template, &context)?;
            out.push('\n');
            Ok(out)
        }
        Command::RenderData { data, format, .. } => {
            let tree = input::load_document(data)?;
            tracing::debug!(path = %data.display(), "rendering data");
            let rendered = renderer
                .render_data(&tree, &context)
                .with_context(|| format!("failed to render {}", data.display()))?;
            input::format_data(&rendered, *format)
        }
        Command::RenderJinja { template, .. } => {
            tracing::debug!(path = %template.display(), "rendering jinja template");
            let out = renderer
                .render_jinja_file(template, &context)
                .with_context(|| format!("failed to render {}", template.display()))?;
            Ok(out)
        }
    }
}
