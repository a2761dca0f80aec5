//! QR code rendering of UR text

use std::fmt::Write as _;

use base64::{engine::general_purpose, Engine as _};
use qrcode::{Color, EcLevel, QrCode};
use serde_json::Value;

use crate::error::ApiError;

pub const DEFAULT_SCALE: u32 = 8;
pub const MIN_SCALE: u32 = 3;
pub const MAX_SCALE: u32 = 12;
/// Light border around the symbol, in modules
pub const MARGIN: usize = 1;

/// Pixels per module, clamped to [3, 12]; missing or zero means the default
pub fn clamp_scale(requested: Option<f64>) -> u32 {
    match requested {
        Some(scale) if scale.is_finite() && scale != 0.0 => {
            scale.clamp(MIN_SCALE as f64, MAX_SCALE as f64) as u32
        }
        _ => DEFAULT_SCALE,
    }
}

/// Numeric reading of a loosely typed `qrScale`: numbers, numeric strings and
/// booleans count, anything else is treated as missing
pub fn scale_from_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Render `text` as an SVG QR code (error correction L) inside a data URL
pub fn render_data_url(text: &str, scale: u32) -> Result<String, ApiError> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::L)
        .map_err(|e| ApiError::Internal(format!("QR encoding failed: {}", e)))?;

    Ok(format!(
        "data:image/svg+xml;base64,{}",
        general_purpose::STANDARD.encode(render_svg(&code, scale as usize))
    ))
}

fn render_svg(code: &QrCode, scale: usize) -> String {
    let width = code.width();
    let size = (width + 2 * MARGIN) * scale;

    let mut path = String::new();
    for (i, color) in code.to_colors().iter().enumerate() {
        if *color == Color::Dark {
            let x = (i % width + MARGIN) * scale;
            let y = (i / width + MARGIN) * scale;
            let _ = write!(path, "M{x} {y}h{scale}v{scale}h-{scale}z");
        }
    }

    format!(
        concat!(
            r#"<?xml version="1.0" standalone="yes"?>"#,
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{size}" height="{size}" viewBox="0 0 {size} {size}" shape-rendering="crispEdges">"#,
            r##"<rect x="0" y="0" width="{size}" height="{size}" fill="#fff"/>"##,
            r##"<path fill="#000" d="{path}"/>"##,
            "</svg>"
        ),
        size = size,
        path = path,
    )
}
