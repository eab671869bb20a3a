//! Ascii line charts.
//!
//! The layout follows the familiar asciigraph style: a labelled y axis on
//! the left and box-drawing glyphs tracing the series to its right.
//!
//! ```text
//!  3.00 ┤ ╭
//!  2.00 ┤╭╯
//!  1.00 ┼╯
//! ```

use std::borrow::Cow;

/// Ascii line chart options
#[derive(Clone, Debug)]
pub struct Plot {
    height: usize,
    width: usize,
    offset: usize,
    precision: usize,
}

impl Default for Plot {
    fn default() -> Self {
        Self {
            height: 0,
            width: 0,
            offset: 3,
            precision: 2,
        }
    }
}

impl Plot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows between the minimum and maximum; 0 derives it from the data
    pub fn height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    /// Number of plotted columns; 0 plots one column per point
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Columns reserved left of the data for the axis
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Base number of decimals in axis labels
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Render `series` as a multi-line string without a trailing newline.
    ///
    /// Non-finite points are drawn as gaps. A series with no finite point
    /// renders as the empty string.
    pub fn render(&self, series: &[f64]) -> String {
        let offset = if self.offset == 0 { 3 } else { self.offset };

        let points: Vec<f64> = series
            .iter()
            .map(|&v| if v.is_finite() { v } else { f64::NAN })
            .collect();
        let data = if self.width > 1 && !points.is_empty() {
            interpolate(&points, self.width)
        } else {
            points
        };

        let Some((minimum, maximum)) = min_max(&data) else {
            return String::new();
        };

        let interval = (maximum - minimum).abs();
        let height = if self.height > 0 {
            self.height
        } else {
            calculate_height(interval)
        };
        // intervals too small to scale are plotted like a flat series
        let ratio = match height as f64 / interval {
            r if interval != 0.0 && r.is_finite() => r,
            _ => 1.0,
        };

        let min2 = (minimum * ratio).round() as i64;
        let max2 = (maximum * ratio).round() as i64;
        let rows = (max2 - min2).unsigned_abs() as usize;
        let width = data.len() + offset;

        let mut plot: Vec<Vec<Cow<'static, str>>> = vec![vec![Cow::Borrowed(" "); width]; rows + 1];

        let precision = self.label_precision(minimum, maximum);
        let max_width = format!("{:.*}", precision, maximum)
            .len()
            .max(format!("{:.*}", precision, minimum).len());

        // axis and labels
        for w in 0..=rows {
            let magnitude = if rows > 0 {
                maximum - (w as f64 * interval / rows as f64)
            } else {
                maximum
            };

            let label = format!("{:>width$.prec$}", magnitude, width = max_width + 1, prec = precision);
            let h = offset.saturating_sub(label.len());
            plot[w][h] = Cow::Owned(label);
            // the row at level zero carries the origin mark
            plot[w][offset - 1] = if min2 <= 0 && max2 >= 0 && w as i64 == max2 {
                Cow::Borrowed("┼")
            } else {
                Cow::Borrowed("┤")
            };
        }

        let level = |v: f64| -> usize { ((v * ratio).round() as i64 - min2).clamp(0, rows as i64) as usize };

        if let Some(&first) = data.first() {
            if !first.is_nan() {
                plot[rows - level(first)][offset - 1] = Cow::Borrowed("┼");
            }
        }

        for (x, pair) in data.windows(2).enumerate() {
            let (d0, d1) = (pair[0], pair[1]);
            let col = x + offset;

            match (d0.is_nan(), d1.is_nan()) {
                (true, true) => continue,
                (false, true) => {
                    plot[rows - level(d0)][col] = Cow::Borrowed("╴");
                    continue;
                }
                (true, false) => {
                    plot[rows - level(d1)][col] = Cow::Borrowed("╶");
                    continue;
                }
                (false, false) => {}
            }

            let (y0, y1) = (level(d0), level(d1));
            if y0 == y1 {
                plot[rows - y0][col] = Cow::Borrowed("─");
                continue;
            }

            if y0 > y1 {
                plot[rows - y1][col] = Cow::Borrowed("╰");
                plot[rows - y0][col] = Cow::Borrowed("╮");
            } else {
                plot[rows - y1][col] = Cow::Borrowed("╭");
                plot[rows - y0][col] = Cow::Borrowed("╯");
            }

            for y in (y0.min(y1) + 1)..y0.max(y1) {
                plot[rows - y][col] = Cow::Borrowed("│");
            }
        }

        let lines: Vec<String> = plot
            .iter()
            .map(|row| {
                let last = row.iter().rposition(|c| *c != " ").unwrap_or(0);
                row[..=last].concat()
            })
            .collect();

        lines.join("\n")
    }

    /// More decimals for small magnitudes, none above 100
    fn label_precision(&self, minimum: f64, maximum: f64) -> usize {
        let log_maximum = if minimum == 0.0 && maximum == 0.0 {
            -1.0
        } else {
            maximum.abs().max(minimum.abs()).log10()
        };

        if log_maximum < 0.0 {
            if log_maximum % 1.0 != 0.0 {
                self.precision + log_maximum.abs() as usize
            } else {
                self.precision + (log_maximum.abs() - 1.0) as usize
            }
        } else if log_maximum > 2.0 {
            0
        } else {
            self.precision
        }
    }
}

fn calculate_height(interval: f64) -> usize {
    if interval >= 1.0 {
        interval as usize
    } else {
        1
    }
}

/// Min and max of the non-NaN points
fn min_max(data: &[f64]) -> Option<(f64, f64)> {
    data.iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Linearly resample `data` to exactly `fit_count` points, keeping both ends
fn interpolate(data: &[f64], fit_count: usize) -> Vec<f64> {
    let last = data.len() - 1;
    let spring_factor = last as f64 / (fit_count - 1) as f64;

    let mut out = Vec::with_capacity(fit_count);
    out.push(data[0]);
    for i in 1..fit_count - 1 {
        let spring = i as f64 * spring_factor;
        let before = (spring.floor() as usize).min(last);
        let after = (spring.ceil() as usize).min(last);
        let at = spring - spring.floor();
        out.push(data[before] + (data[after] - data[before]) * at);
    }
    out.push(data[last]);
    out
}
