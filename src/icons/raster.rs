//! Icon rasterization - Offline batch that renders PNG swatches for color tokens
//!
//! Gradients are drawn horizontally: column `x` sits at
//! `x / (width - 1) * (stops - 1)` along the stop list and blends the two
//! nearest stops by the fractional part.

use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::config::Config;
use crate::core::model::{Item, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::safe_name;
use crate::icons::color::{IconSpec, Rgba};
use crate::store::{Corpus, Token};

/// Color of column `x` in a horizontal gradient of `width` columns
pub fn gradient_color(stops: &[Rgba], x: u32, width: u32) -> Rgba {
    match stops {
        [] => Rgba::WHITE,
        [only] => *only,
        _ => {
            let progress = if width > 1 {
                x as f64 / (width - 1) as f64
            } else {
                0.0
            };
            let position = progress * (stops.len() - 1) as f64;
            let lower = (position.floor() as usize).min(stops.len() - 1);
            let upper = (lower + 1).min(stops.len() - 1);
            stops[lower].lerp(stops[upper], position - lower as f64)
        }
    }
}

/// Render a square icon
pub fn render(spec: &IconSpec, size: u32) -> RgbaImage {
    match spec {
        IconSpec::Solid(color) => RgbaImage::from_pixel(size, size, image::Rgba(color.channels())),
        IconSpec::Gradient(stops) => {
            let columns: Vec<_> = (0..size).map(|x| gradient_color(stops, x, size)).collect();
            RgbaImage::from_fn(size, size, |x, _| image::Rgba(columns[x as usize].channels()))
        }
    }
}

/// Icon path for a token under `images_dir`
pub fn icon_path(images_dir: &Path, token_name: &str) -> PathBuf {
    images_dir.join(format!("{}.png", safe_name(token_name)))
}

/// Totals of one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IconReport {
    pub generated: usize,
    /// Color-like tokens without a parsable color
    pub skipped: usize,
    pub failed: usize,
}

enum IconOutcome {
    Generated,
    Skipped,
    Failed,
}

fn generate_one(token: &Token, out_dir: &Path, size: u32) -> IconOutcome {
    let Some(spec) = IconSpec::from_value(&token.value) else {
        debug!(token = %token.name, "no parsable color; skipping icon");
        return IconOutcome::Skipped;
    };

    let path = icon_path(out_dir, &token.name);
    match render(&spec, size).save_with_format(&path, ImageFormat::Png) {
        Ok(()) => IconOutcome::Generated,
        Err(err) => {
            warn!(token = %token.name, error = %err, "failed to write icon");
            IconOutcome::Failed
        }
    }
}

/// Render icons for every color-like token into `out_dir`
pub fn generate_icons(corpus: &Corpus, out_dir: &Path, size: u32) -> Result<IconReport> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create icon directory: {:?}", out_dir))?;

    let tokens: Vec<&Token> = corpus.iter().filter(|t| t.is_color_like).collect();

    #[cfg(feature = "parallel")]
    let outcomes: Vec<IconOutcome> = tokens
        .par_iter()
        .map(|token| generate_one(token, out_dir, size))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<IconOutcome> = tokens
        .iter()
        .map(|token| generate_one(token, out_dir, size))
        .collect();

    let mut report = IconReport::default();
    for outcome in outcomes {
        match outcome {
            IconOutcome::Generated => report.generated += 1,
            IconOutcome::Skipped => report.skipped += 1,
            IconOutcome::Failed => report.failed += 1,
        }
    }
    Ok(report)
}

/// Render icons for the local corpus and print a report
pub fn run_generate(config: &Config, out_dir: &Path, render_config: RenderConfig) -> Result<()> {
    let corpus = Corpus::load(&config.layout().document()).context("Failed to load token document")?;
    let report = generate_icons(&corpus, out_dir, config.icon_size)?;

    let mut result_set = ResultSet::new();
    result_set.push(Item::message(
        "icons",
        format!("Generated {} icons", report.generated),
        format!(
            "{} skipped, {} failed, written to {}",
            report.skipped,
            report.failed,
            out_dir.display()
        ),
    ));

    let renderer = Renderer::with_config(render_config);
    renderer
        .render_to(&result_set, std::io::stdout().lock())
        .context("Failed to write report")?;
    Ok(())
}
