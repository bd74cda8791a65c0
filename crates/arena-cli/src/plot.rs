//! Per-pair score trajectories rendered into one stacked PNG.
//!
//! No text rendering: panels follow the results table's row-major pair order,
//! which is also the order of the "Running game" log lines. Each panel's header
//! carries one pip per catalog number of player 1's strategy in player 1's
//! colour, then the same for player 2, so `arena strategies` doubles as legend.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use match_logic::{MatchResult, ResultMatrix};

const PANEL_WIDTH: u32 = 1280;
const PANEL_HEIGHT: u32 = 360;
const MARGIN: u32 = 24;
const PIP: u32 = 8;
const PIP_GAP: u32 = 4;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const FRAME: Rgb<u8> = Rgb([160, 160, 160]);
const PLAYER_1: Rgb<u8> = Rgb([31, 119, 180]);
const PLAYER_2: Rgb<u8> = Rgb([255, 127, 14]);

/// Render every match in row-major order and write the image to `path`.
pub fn save_plots(matrix: &ResultMatrix, path: &Path) -> Result<()> {
    let results: Vec<&MatchResult> = matrix.pairs().map(|(_, result)| result).collect();
    let image = render(&results)?;
    image
        .save(path)
        .with_context(|| format!("failed to write plot to {}", path.display()))?;
    log::info!("Saved {} trajectory plots to {}", results.len(), path.display());
    Ok(())
}

/// One panel per result, stacked top to bottom.
pub fn render(results: &[&MatchResult]) -> Result<RgbImage> {
    if results.is_empty() {
        anyhow::bail!("nothing to plot: no matches were played");
    }
    let height = PANEL_HEIGHT * results.len() as u32;
    let mut image = RgbImage::from_pixel(PANEL_WIDTH, height, BACKGROUND);

    for (panel, result) in results.iter().enumerate() {
        let trajectory = result.trajectory.as_ref().with_context(|| {
            format!(
                "{} vs. {} has no per-round scores; run in trajectory mode",
                result.strategy_a, result.strategy_b
            )
        })?;
        let area = PlotArea::for_panel(panel as u32);
        area.frame(&mut image);
        area.key(&mut image, result.strategy_a.number(), result.strategy_b.number());

        let ceiling = trajectory
            .scores_a
            .iter()
            .chain(trajectory.scores_b.iter())
            .fold(0.0f64, |max, &score| max.max(score));
        area.series(&mut image, &trajectory.scores_a, ceiling, PLAYER_1);
        area.series(&mut image, &trajectory.scores_b, ceiling, PLAYER_2);
    }

    Ok(image)
}

/// Inner plotting rectangle of one panel, in image pixels
struct PlotArea {
    left: u32,
    top: u32,
    width: u32,
    height: u32,
}

impl PlotArea {
    fn for_panel(panel: u32) -> Self {
        Self {
            left: MARGIN,
            top: panel * PANEL_HEIGHT + MARGIN,
            width: PANEL_WIDTH - 2 * MARGIN,
            height: PANEL_HEIGHT - 2 * MARGIN,
        }
    }

    fn frame(&self, image: &mut RgbImage) {
        let right = self.left + self.width;
        let bottom = self.top + self.height;
        for x in self.left..=right {
            image.put_pixel(x, self.top, FRAME);
            image.put_pixel(x, bottom, FRAME);
        }
        for y in self.top..=bottom {
            image.put_pixel(self.left, y, FRAME);
            image.put_pixel(right, y, FRAME);
        }
    }

    /// Pips in the strip above the frame: `pips_a` in player 1's colour, a
    /// wider gap, then `pips_b` in player 2's colour.
    fn key(&self, image: &mut RgbImage, pips_a: usize, pips_b: usize) {
        let y = self.top - MARGIN + (MARGIN - PIP) / 2;
        let mut x = self.left;
        for (pips, color) in [(pips_a, PLAYER_1), (pips_b, PLAYER_2)] {
            for _ in 0..pips {
                fill(image, x, y, PIP, color);
                x += PIP + PIP_GAP;
            }
            x += 2 * PIP;
        }
    }

    /// Pixel row for a score in [0, ceiling], strictly inside the frame
    fn row(&self, score: f64, ceiling: f64) -> u32 {
        let fraction = if ceiling > 0.0 { (score / ceiling).clamp(0.0, 1.0) } else { 0.0 };
        let offset = (fraction * (self.height - 2) as f64).round() as u32;
        self.top + self.height - 1 - offset
    }

    /// Draws the min..max envelope of each column's bucket of rounds, joined
    /// to the previous column so sparse series stay connected.
    fn series(&self, image: &mut RgbImage, scores: &[f64], ceiling: f64, color: Rgb<u8>) {
        if scores.is_empty() {
            return;
        }
        let columns = self.width - 1;
        let mut previous: Option<f64> = None;
        for column in 0..columns {
            let start = column as usize * scores.len() / columns as usize;
            let end = ((column as usize + 1) * scores.len() / columns as usize).max(start + 1);
            let bucket = &scores[start..end.min(scores.len())];
            let (mut low, mut high) = bucket
                .iter()
                .fold((f64::MAX, f64::MIN), |(lo, hi), &s| (lo.min(s), hi.max(s)));
            if let Some(last) = previous {
                low = low.min(last);
                high = high.max(last);
            }
            let x = self.left + 1 + column;
            // Higher scores sit on smaller rows
            for y in self.row(high, ceiling)..=self.row(low, ceiling) {
                image.put_pixel(x, y, color);
            }
            previous = bucket.last().copied();
        }
    }
}

fn fill(image: &mut RgbImage, left: u32, top: u32, size: u32, color: Rgb<u8>) {
    for y in top..top + size {
        for x in left..left + size {
            image.put_pixel(x, y, color);
        }
    }
}
