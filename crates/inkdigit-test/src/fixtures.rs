//! Synthetic ink fixtures
//!
//! Digits are drawn as seven-segment-like polylines inside a 40x60 box
//! and densified to one sample every [`SAMPLE_STEP`] pixels, 16 ms apart,
//! so they look like captured pointer input to the stroke intake filter.

use inkdigit_core::{BitGrid, Point, Result, Shape, Stroke};

/// Distance between generated samples along a polyline
pub const SAMPLE_STEP: f64 = 4.0;

/// Milliseconds between generated samples
pub const SAMPLE_INTERVAL_MS: u64 = 16;

/// Milliseconds between the starts of consecutive strokes of one digit
pub const STROKE_INTERVAL_MS: u64 = 300;

/// Canvas width used by the two-digit scenario
pub const SCENARIO_CANVAS_WIDTH: f64 = 400.0;

/// Nominal glyph box of the digit fixtures
pub const GLYPH_WIDTH: f64 = 40.0;
pub const GLYPH_HEIGHT: f64 = 60.0;

/// Polyline vertices of each stroke of digit `d`, in glyph coordinates
pub fn digit_outline(d: u8) -> Vec<Vec<(f64, f64)>> {
    match d {
        0 => vec![vec![(0.0, 0.0), (40.0, 0.0), (40.0, 60.0), (0.0, 60.0), (0.0, 0.0)]],
        1 => vec![vec![(10.0, 10.0), (20.0, 0.0), (20.0, 60.0)]],
        2 => vec![vec![
            (0.0, 10.0),
            (10.0, 0.0),
            (30.0, 0.0),
            (40.0, 10.0),
            (40.0, 22.0),
            (0.0, 60.0),
            (40.0, 60.0),
        ]],
        3 => vec![vec![
            (0.0, 0.0),
            (40.0, 0.0),
            (20.0, 28.0),
            (40.0, 40.0),
            (40.0, 52.0),
            (30.0, 60.0),
            (0.0, 60.0),
        ]],
        4 => vec![
            vec![(0.0, 0.0), (0.0, 35.0), (40.0, 35.0)],
            vec![(30.0, 10.0), (30.0, 60.0)],
        ],
        5 => vec![vec![
            (40.0, 0.0),
            (0.0, 0.0),
            (0.0, 28.0),
            (30.0, 28.0),
            (40.0, 38.0),
            (40.0, 50.0),
            (30.0, 60.0),
            (0.0, 60.0),
        ]],
        6 => vec![vec![
            (35.0, 0.0),
            (0.0, 30.0),
            (0.0, 60.0),
            (40.0, 60.0),
            (40.0, 32.0),
            (0.0, 32.0),
        ]],
        7 => vec![
            vec![(0.0, 0.0), (40.0, 0.0)],
            vec![(40.0, 0.0), (15.0, 60.0)],
            vec![(10.0, 30.0), (35.0, 30.0)],
        ],
        8 => vec![vec![
            (0.0, 30.0),
            (0.0, 0.0),
            (40.0, 0.0),
            (40.0, 60.0),
            (0.0, 60.0),
            (0.0, 30.0),
            (40.0, 30.0),
        ]],
        _ => vec![vec![
            (40.0, 30.0),
            (0.0, 30.0),
            (0.0, 0.0),
            (40.0, 0.0),
            (40.0, 60.0),
            (5.0, 60.0),
        ]],
    }
}

/// Densify a polyline into a stroke
///
/// Every segment is split into pieces no longer than [`SAMPLE_STEP`];
/// timestamps start at `start_time` and advance by [`SAMPLE_INTERVAL_MS`].
pub fn polyline(vertices: &[(f64, f64)], start_time: u64) -> Result<Stroke> {
    let mut points = Vec::new();
    let mut t = start_time;
    if let Some(&(x, y)) = vertices.first() {
        points.push(Point::new(x, y, t));
    }
    for pair in vertices.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        let len = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        let n = ((len / SAMPLE_STEP).ceil() as usize).max(1);
        for i in 1..=n {
            let f = i as f64 / n as f64;
            t += SAMPLE_INTERVAL_MS;
            points.push(Point::new(x0 + (x1 - x0) * f, y0 + (y1 - y0) * f, t));
        }
    }
    Stroke::new(points)
}

/// Strokes of digit `d` placed at `(origin_x, origin_y)` and scaled
pub fn digit_strokes(
    d: u8,
    origin_x: f64,
    origin_y: f64,
    scale: f64,
    start_time: u64,
) -> Result<Vec<Stroke>> {
    digit_outline(d)
        .iter()
        .enumerate()
        .map(|(k, outline)| {
            let placed: Vec<(f64, f64)> = outline
                .iter()
                .map(|&(x, y)| (origin_x + x * scale, origin_y + y * scale))
                .collect();
            polyline(&placed, start_time + k as u64 * STROKE_INTERVAL_MS)
        })
        .collect()
}

/// Three-stroke "7" at (100, 100)
pub fn seven() -> Result<Vec<Stroke>> {
    digit_strokes(7, 100.0, 100.0, 1.0, 0)
}

/// A "4" followed by a "3" with a 60 px horizontal gap, for a canvas
/// [`SCENARIO_CANVAS_WIDTH`] wide
pub fn four_and_three() -> Result<Vec<Stroke>> {
    let mut strokes = digit_strokes(4, 20.0, 20.0, 1.0, 0)?;
    strokes.extend(digit_strokes(3, 20.0 + GLYPH_WIDTH + 60.0, 20.0, 1.0, 1000)?);
    Ok(strokes)
}

/// A canvas with one filled axis-aligned square
pub fn filled_square_grid(width: u32, height: u32, x: u32, y: u32, side: u32) -> Result<BitGrid> {
    let mut grid = BitGrid::new(width, height)?;
    for yy in y..(y + side).min(height) {
        for xx in x..(x + side).min(width) {
            grid.set(xx, yy, true)?;
        }
    }
    Ok(grid)
}

/// Rasterize strokes onto a canvas with the given pen width
pub fn render_strokes(strokes: &[Stroke], width: u32, height: u32, pen_width: u32) -> Result<BitGrid> {
    let mut grid = BitGrid::new(width, height)?;
    for stroke in strokes {
        stroke.render(&mut grid, 0, 0, pen_width);
    }
    Ok(grid)
}

/// Perceptron weights that classify by correlation with class templates
///
/// Hidden unit `j` computes a scaled correlation between the input and
/// the mean-centred `templates[j]`; output `k` is a monotone function of
/// hidden unit `k`. An input identical to a template therefore ranks that
/// template's class highest. Returns `(theta1, theta2)` with shapes
/// `(input_dim + 1) x n` and `(n + 1) x n`, where `n = templates.len()`.
pub fn template_weights(templates: &[Vec<f32>]) -> (Vec<Vec<f32>>, Vec<Vec<f32>>) {
    const HIDDEN_GAIN: f32 = 0.1;
    const OUTPUT_GAIN: f32 = 8.0;

    let n = templates.len();
    let input_dim = templates.first().map_or(0, Vec::len);

    let mut theta1 = vec![vec![0.0f32; n]; input_dim + 1];
    for (j, template) in templates.iter().enumerate() {
        let mean = template.iter().sum::<f32>() / input_dim.max(1) as f32;
        let norm = template
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f32>()
            .sqrt();
        if norm > 0.0 {
            for (i, v) in template.iter().enumerate() {
                theta1[i + 1][j] = HIDDEN_GAIN * (v - mean) / norm;
            }
        }
    }

    let mut theta2 = vec![vec![0.0f32; n]; n + 1];
    for k in 0..n {
        theta2[0][k] = -OUTPUT_GAIN / 2.0;
        theta2[k + 1][k] = OUTPUT_GAIN;
    }

    (theta1, theta2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyline_densifies() {
        let s = polyline(&[(0.0, 0.0), (40.0, 0.0)], 100).unwrap();
        assert_eq!(s.len(), 11);
        assert_eq!(s.path_length(), 40.0);
        assert_eq!(s.start_time(), 100);
        assert_eq!(s.end().timestamp, 100 + 10 * SAMPLE_INTERVAL_MS);
    }

    #[test]
    fn test_digit_strokes_fit_glyph_box() {
        for d in 0..10 {
            let strokes = digit_strokes(d, 5.0, 7.0, 1.0, 0).unwrap();
            for s in &strokes {
                let b = s.bounding_box();
                assert!(b.min_x >= 5.0 && b.max_x <= 45.0, "digit {d}");
                assert!(b.min_y >= 7.0 && b.max_y <= 67.0, "digit {d}");
                assert!(s.len() >= 3 && s.path_length() >= 10.0, "digit {d}");
            }
        }
    }

    #[test]
    fn test_four_and_three_gap() {
        let strokes = four_and_three().unwrap();
        assert_eq!(strokes.len(), 3);
        let four_max = strokes[0].bounding_box().max_x.max(strokes[1].bounding_box().max_x);
        let three_min = strokes[2].bounding_box().min_x;
        assert_eq!(three_min - four_max, 60.0);
    }

    #[test]
    fn test_template_weights_shape() {
        let (t1, t2) = template_weights(&[vec![0.0, 1.0, 0.0], vec![1.0, 0.0, 1.0]]);
        assert_eq!((t1.len(), t1[0].len()), (4, 2));
        assert_eq!((t2.len(), t2[0].len()), (3, 2));
        assert_eq!(t1[0], vec![0.0, 0.0]);
    }
}
