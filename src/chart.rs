//! Chart geometry in SVG user units.
//!
//! Charts are laid out here as plain data (bar rectangles, marker positions,
//! axis ticks) so renderers only have to draw what they are given.

use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

pub const CHART_WIDTH: f64 = 640.0;
pub const CHART_HEIGHT: f64 = 360.0;

const MARGIN_TOP: f64 = 40.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 56.0;
const BAR_MARGIN_LEFT: f64 = 120.0;
const LINE_MARGIN_LEFT: f64 = 72.0;
const BAR_FILL_RATIO: f64 = 0.8;
const TARGET_TICKS: usize = 5;

/// Plot area inside the chart canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Frame {
    fn new(margin_left: f64) -> Self {
        Self {
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            left: margin_left,
            top: MARGIN_TOP,
            right: CHART_WIDTH - MARGIN_RIGHT,
            bottom: CHART_HEIGHT - MARGIN_BOTTOM,
        }
    }

    fn plot_height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f64 {
        round2((self.left + self.right) / 2.0)
    }

    pub fn center_y(&self) -> f64 {
        round2((self.top + self.bottom) / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
    pub value_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub value_label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Vertical center of the bar, where its category label sits.
    pub label_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axes {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

/// Horizontal bar chart: one band per category from top to bottom, bar
/// length proportional to value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    #[serde(flatten)]
    pub axes: Axes,
    pub frame: Frame,
    pub center_x: f64,
    pub center_y: f64,
    pub bars: Vec<Bar>,
    pub ticks: Vec<Tick>,
}

impl BarChart {
    pub fn horizontal(axes: Axes, data: &[BarDatum]) -> Self {
        let frame = Frame::new(BAR_MARGIN_LEFT);
        let (lo, hi) = value_domain(data.iter().map(|d| d.value), true);
        let scale = LinearScale::new(lo, hi, frame.left, frame.right);
        let band = if data.is_empty() {
            0.0
        } else {
            frame.plot_height() / data.len() as f64
        };
        let zero = scale.map(0.0_f64.clamp(lo, hi));

        let bars = data
            .iter()
            .enumerate()
            .map(|(idx, datum)| {
                let end = scale.map(datum.value);
                let band_top = frame.top + band * idx as f64;
                let height = band * BAR_FILL_RATIO;
                let y = band_top + (band - height) / 2.0;
                Bar {
                    label: datum.label.clone(),
                    value: datum.value,
                    value_label: datum.value_label.clone(),
                    x: round2(zero.min(end)),
                    y: round2(y),
                    width: round2((end - zero).abs()),
                    height: round2(height),
                    label_y: round2(y + height / 2.0),
                }
            })
            .collect();

        let ticks = nice_ticks(lo, hi, TARGET_TICKS)
            .into_iter()
            .map(|value| Tick {
                position: round2(scale.map(value)),
                label: format_tick(value),
            })
            .collect();

        Self {
            axes,
            center_x: frame.center_x(),
            center_y: frame.center_y(),
            frame,
            bars,
            ticks,
        }
    }

    pub fn max_value(&self) -> f64 {
        self.bars.iter().map(|b| b.value).fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointDatum {
    pub x: i64,
    pub y: f64,
    pub y_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub x_value: i64,
    pub y_value: f64,
    pub y_label: String,
    pub cx: f64,
    pub cy: f64,
}

/// Line chart over integer x values; markers are joined in ascending x order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    #[serde(flatten)]
    pub axes: Axes,
    pub frame: Frame,
    pub center_x: f64,
    pub center_y: f64,
    pub markers: Vec<Marker>,
    /// `points` attribute of the SVG polyline.
    pub points: String,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

impl LineChart {
    pub fn new(axes: Axes, data: &[PointDatum]) -> Self {
        let frame = Frame::new(LINE_MARGIN_LEFT);
        let mut data = data.to_vec();
        data.sort_by_key(|d| d.x);

        let (x_lo, x_hi) = value_domain(data.iter().map(|d| d.x as f64), false);
        let (y_lo, y_hi) = padded(value_domain(data.iter().map(|d| d.y), false));
        let x_scale = LinearScale::new(x_lo, x_hi, frame.left, frame.right);
        let y_scale = LinearScale::new(y_lo, y_hi, frame.bottom, frame.top);

        let markers = data
            .iter()
            .map(|d| Marker {
                x_value: d.x,
                y_value: d.y,
                y_label: d.y_label.clone(),
                cx: round2(x_scale.map(d.x as f64)),
                cy: round2(y_scale.map(d.y)),
            })
            .collect::<Vec<_>>();
        let points = markers
            .iter()
            .map(|m| format!("{},{}", m.cx, m.cy))
            .join(" ");

        let x_ticks = nice_ticks(x_lo, x_hi, TARGET_TICKS)
            .into_iter()
            .filter(|value| value.fract() == 0.0)
            .map(|value| Tick {
                position: round2(x_scale.map(value)),
                label: format_tick(value),
            })
            .collect();
        let y_ticks = nice_ticks(y_lo, y_hi, TARGET_TICKS)
            .into_iter()
            .map(|value| Tick {
                position: round2(y_scale.map(value)),
                label: format_tick(value),
            })
            .collect();

        Self {
            axes,
            center_x: frame.center_x(),
            center_y: frame.center_y(),
            frame,
            markers,
            points,
            x_ticks,
            y_ticks,
        }
    }
}

struct LinearScale {
    domain_lo: f64,
    domain_span: f64,
    range_lo: f64,
    range_span: f64,
}

impl LinearScale {
    fn new(domain_lo: f64, domain_hi: f64, range_lo: f64, range_hi: f64) -> Self {
        Self {
            domain_lo,
            domain_span: domain_hi - domain_lo,
            range_lo,
            range_span: range_hi - range_lo,
        }
    }

    fn map(&self, value: f64) -> f64 {
        self.range_lo + (value - self.domain_lo) / self.domain_span * self.range_span
    }
}

/// Smallest and largest value, widened to a non-empty interval. With
/// `include_zero` the interval always reaches the origin so bar lengths stay
/// proportional.
fn value_domain(values: impl Iterator<Item = f64>, include_zero: bool) -> (f64, f64) {
    let (mut lo, mut hi) = match values.minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => (0.0, 1.0),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if hi - lo <= f64::EPSILON * hi.abs().max(1.0) {
        lo -= 1.0;
        hi += 1.0;
    }
    (lo, hi)
}

fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// Round tick values (steps of 1, 2 or 5 times a power of ten) inside
/// `[lo, hi]`.
pub fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 || target == 0 {
        return Vec::new();
    }
    let raw_step = span / target as f64;
    let magnitude = 10f64.powi(raw_step.log10().floor() as i32);
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw_step)
        .unwrap_or(10.0 * magnitude);

    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|i| round_to_step(i as f64 * step, step)).collect()
}

fn round_to_step(value: f64, step: f64) -> f64 {
    let decimals = (-step.log10().floor()).max(0.0) as i32;
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.4}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
