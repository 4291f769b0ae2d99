//! Deterministic family colors.

/// Hand-picked colors for the first families
pub const PALETTE: [&str; 10] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ac",
];

/// Hue step between two generated colors, in degrees
pub const GOLDEN_ANGLE: f64 = 137.508;

const SATURATION: f64 = 0.65;
const LIGHTNESS: f64 = 0.5;

/// Color of the family created at `index`, as `#rrggbb`
///
/// Indices past the palette walk the hue circle by the golden angle, which
/// keeps consecutive families far apart on the wheel.
pub fn generate_color(index: usize) -> String {
    if let Some(color) = PALETTE.get(index) {
        return (*color).to_string();
    }

    let hue = (index as f64 * GOLDEN_ANGLE) % 360.0;
    let (r, g, b) = hsl_to_rgb(hue, SATURATION, LIGHTNESS);
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Convert a hue in degrees and saturation/lightness in [0, 1] to 8-bit RGB
fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let h = (hue / 360.0).rem_euclid(1.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let to_byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    if s == 0.0 {
        let v = to_byte(l);
        return (v, v, v);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        to_byte(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_byte(hue_to_rgb(p, q, h)),
        to_byte(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}
