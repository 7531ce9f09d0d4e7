//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The x-axis is a band scale over point order (labels are categories, not
//! numbers). Plot elements:
//! - points: `o`
//! - connecting line: `-`

use crate::domain::ChartData;

/// Message printed instead of an empty grid.
pub const NO_DATA: &str = "No data available to chart.";

/// Render chart data as a line plot.
pub fn render_ascii_chart(chart: &ChartData, width: usize, height: usize) -> String {
    if chart.is_empty() {
        return format!("{NO_DATA}\n");
    }

    let width = width.max(10);
    let height = height.max(5);
    let n = chart.values.len();

    let (y_min, y_max) = value_range(&chart.values);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    let cells: Vec<(usize, usize)> = chart
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| (map_x(i, n, width), map_y(v, y_min, y_max, height)))
        .collect();

    // Line first, so points overlay it.
    for pair in cells.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        draw_line(&mut grid, x0, y0, x1, y1, '-');
    }
    for &(x, y) in &cells {
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | n={n} | y=[{y_min:.2}, {y_max:.2}]\n",
        chart.source.display_name()
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&axis_labels(chart, width));
    out.push('\n');

    out
}

/// First label on the left, last label on the right (if both fit).
fn axis_labels(chart: &ChartData, width: usize) -> String {
    let first = chart.labels.first().map(String::as_str).unwrap_or("");
    let last = chart.labels.last().map(String::as_str).unwrap_or("");
    let first_len = first.chars().count();
    let last_len = last.chars().count();

    if chart.labels.len() < 2 || first_len + last_len + 1 > width {
        return crate::report::truncate(first, width);
    }
    format!("{first}{}{last}", " ".repeat(width - first_len - last_len))
}

fn value_range(values: &[f64]) -> (f64, f64) {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &v in values {
        min_y = min_y.min(v);
        max_y = max_y.max(v);
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        return (0.0, 1.0);
    }
    if max_y <= min_y {
        // Flat series: center it.
        return (min_y - 1.0, max_y + 1.0);
    }
    (min_y, max_y)
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesSource;

    fn chart(labels: &[&str], values: &[f64]) -> ChartData {
        ChartData {
            source: SeriesSource::Local,
            labels: labels.iter().map(|s| s.to_string()).collect(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn plot_golden_snapshot_flat() {
        let txt = render_ascii_chart(&chart(&["a", "b", "c"], &[5.0, 5.0, 5.0]), 10, 5);
        let expected = concat!(
            "Plot: Preview | n=3 | y=[3.90, 6.10]\n",
            "          \n",
            "          \n",
            "o----o---o\n",
            "          \n",
            "          \n",
            "a        c\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn rising_series_runs_bottom_left_to_top_right() {
        let txt = render_ascii_chart(&chart(&["lo", "hi"], &[0.0, 10.0]), 10, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[1].chars().nth(9), Some('o'));
        assert_eq!(lines[5].chars().next(), Some('o'));
        assert_eq!(lines[6], "lo      hi");
    }

    #[test]
    fn single_point_renders_at_left_edge() {
        let txt = render_ascii_chart(&chart(&["only"], &[3.0]), 10, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[3], "o         ");
        assert_eq!(lines[6], "only");
    }

    #[test]
    fn empty_chart_prints_no_data() {
        let txt = render_ascii_chart(&ChartData::empty(SeriesSource::Local), 40, 10);
        assert_eq!(txt, format!("{NO_DATA}\n"));
    }
}
