//! Renderer module
//!
//! Renders a ResultSet as the single JSON object the launcher reads.

use crate::core::model::ResultSet;
use std::io::Write;

/// Render configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub pretty: bool,
}

impl RenderConfig {
    pub fn with_pretty(pretty: bool) -> Self {
        Self { pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        let rendered = if self.config.pretty {
            serde_json::to_string_pretty(result_set)
        } else {
            serde_json::to_string(result_set)
        };
        rendered.unwrap_or_else(|_| r#"{"items":[]}"#.to_string())
    }

    /// Render to a writer, followed by a newline
    pub fn render_to<W: Write>(&self, result_set: &ResultSet, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "{}", self.render(result_set))
    }
}
