//! White-balance picking from a preview neighbourhood
//!
//! A click on a neutral surface yields the temperature/tint correction that
//! would make that surface grey. Deltas are computed in linear light and
//! accumulated onto the current setting.

mod picker;

pub use picker::{PickerListener, WhiteBalancePicker};

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::core::WhiteBalanceConfig;
use crate::transform::{Point, Size};

/// Temperature/tint adjustment, each in `[-limit, limit]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteBalance {
    pub temperature: f64,
    pub tint: f64,
}

/// Mean 8-bit RGB of a sampled window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Map a click in logical space (render size / scale) to a source pixel.
///
/// `None` when the click lies outside `[0, logical]` on either axis, or any
/// size is degenerate.
pub fn source_pixel(image: &RgbImage, click: Point, logical: Size) -> Option<(u32, u32)> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || logical.is_degenerate() || !click.is_finite() {
        return None;
    }
    if click.x < 0.0 || click.y < 0.0 || click.x > logical.width || click.y > logical.height {
        return None;
    }

    let sx = click.x * f64::from(width) / logical.width;
    let sy = click.y * f64::from(height) / logical.height;
    // The far edge maps one past the last pixel.
    let px = (sx.floor() as u32).min(width - 1);
    let py = (sy.floor() as u32).min(height - 1);
    Some((px, py))
}

/// Mean colour of the `(2 * radius + 1)^2` window around `(x, y)`, clamped to
/// the image bounds.
pub fn sample_mean(image: &RgbImage, x: u32, y: u32, radius: u32) -> Option<MeanColor> {
    let (width, height) = image.dimensions();
    if x >= width || y >= height {
        return None;
    }
    let x0 = x.saturating_sub(radius);
    let y0 = y.saturating_sub(radius);
    let x1 = x.saturating_add(radius).min(width - 1);
    let y1 = y.saturating_add(radius).min(height - 1);

    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for py in y0..=y1 {
        for px in x0..=x1 {
            let pixel = image.get_pixel(px, py);
            sum[0] += u64::from(pixel[0]);
            sum[1] += u64::from(pixel[1]);
            sum[2] += u64::from(pixel[2]);
            count += 1;
        }
    }

    let n = count as f64;
    Some(MeanColor {
        r: sum[0] as f64 / n,
        g: sum[1] as f64 / n,
        b: sum[2] as f64 / n,
    })
}

fn linearize(value: f64, gamma: f64) -> f64 {
    (value / 255.0).powf(gamma)
}

fn balance_ratio(a: f64, b: f64, min_denominator: f64) -> f64 {
    let denominator = a + b;
    if denominator < min_denominator {
        0.0
    } else {
        (a - b) / denominator
    }
}

/// Correction that would neutralize `mean`.
pub fn white_balance_delta(mean: MeanColor, config: &WhiteBalanceConfig) -> WhiteBalance {
    let r = linearize(mean.r, config.gamma);
    let g = linearize(mean.g, config.gamma);
    let b = linearize(mean.b, config.gamma);
    let magenta = (r + b) / 2.0;

    WhiteBalance {
        temperature: balance_ratio(b, r, config.min_denominator) * config.temperature_scale,
        tint: balance_ratio(g, magenta, config.min_denominator) * config.tint_scale,
    }
}

/// Sample `image` at a logical-space click and accumulate the correction onto
/// `current`. `None` leaves the caller's state untouched.
pub fn pick_white_balance(
    image: &RgbImage,
    click: Point,
    logical: Size,
    current: WhiteBalance,
    config: &WhiteBalanceConfig,
) -> Option<WhiteBalance> {
    let (px, py) = source_pixel(image, click, logical)?;
    let mean = sample_mean(image, px, py, config.sample_radius)?;
    let delta = white_balance_delta(mean, config);
    let limit = config.limit;

    Some(WhiteBalance {
        temperature: (current.temperature + delta.temperature).clamp(-limit, limit),
        tint: (current.tint + delta.tint).clamp(-limit, limit),
    })
}
