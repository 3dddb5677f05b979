use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette (bar charts)
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Sequential scale (correlation heatmap)
// ---------------------------------------------------------------------------

/// Viridis control points, dark purple → yellow.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (0x44, 0x01, 0x54),
    (0x3b, 0x52, 0x8b),
    (0x21, 0x91, 0x8c),
    (0x5e, 0xc9, 0x62),
    (0xfd, 0xe7, 0x25),
];

/// Colour for a correlation coefficient in `[-1, 1]`; grey when undefined.
pub fn heat_color(coefficient: Option<f64>) -> Color32 {
    let Some(r) = coefficient else {
        return Color32::DARK_GRAY;
    };
    let t = ((r.clamp(-1.0, 1.0) + 1.0) / 2.0) as f32;

    let scaled = t * (VIRIDIS.len() - 1) as f32;
    let lo = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - lo as f32;

    let stop = |(r, g, b): (u8, u8, u8)| -> Srgb { Srgb::<u8>::new(r, g, b).into_format() };
    let a = stop(VIRIDIS[lo]);
    let b = stop(VIRIDIS[lo + 1]);
    let lerp = |x: f32, y: f32| x + (y - x) * frac;
    to_color32(Srgb::new(
        lerp(a.red, b.red),
        lerp(a.green, b.green),
        lerp(a.blue, b.blue),
    ))
}

/// Black or white, whichever reads better on `background`.
pub fn label_color(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color32, b: (u8, u8, u8)) -> bool {
        let d = |x: u8, y: u8| (x as i16 - y as i16).abs() <= 1;
        d(a.r(), b.0) && d(a.g(), b.1) && d(a.b(), b.2)
    }

    #[test]
    fn palette_colours_are_distinct() {
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn heat_scale_endpoints() {
        assert!(close(heat_color(Some(-1.0)), VIRIDIS[0]));
        assert!(close(heat_color(Some(0.0)), VIRIDIS[2]));
        assert!(close(heat_color(Some(1.0)), VIRIDIS[4]));
        // out-of-range input is clamped
        assert!(close(heat_color(Some(3.0)), VIRIDIS[4]));
        assert_eq!(heat_color(None), Color32::DARK_GRAY);
    }

    #[test]
    fn labels_contrast_with_background() {
        assert_eq!(label_color(heat_color(Some(1.0))), Color32::BLACK);
        assert_eq!(label_color(heat_color(Some(-1.0))), Color32::WHITE);
    }
}
