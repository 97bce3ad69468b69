//! Axis scaling: rounded axis ceilings, the normal-range band and tick labels

/// First-decimal digit at and above which a value is rounded up
const ROUND_UP_DIGIT: i64 = 8;

/// Values whose integer part is at most this grow by a single unit
const UNIT_GROWTH_LIMIT: f64 = 15.0;

/// Axis ceilings above this use abbreviated (SI-prefixed) tick labels
pub const ABBREVIATE_ABOVE: f64 = 1000.0;

/// Rounds an observed maximum up to the ceiling of a chart's value axis.
///
/// The ceiling always leaves headroom above the highest plotted point:
///
/// | observed | ceiling |
/// |----------|---------|
/// | 1.1      | 2       |
/// | 9.9      | 11      |
/// | 12.1     | 13      |
/// | 20       | 30      |
/// | 99       | 110     |
/// | 100      | 110     |
/// | 1000     | 1100    |
/// | 1100     | 1200    |
///
/// Small values (integer part up to 15) are rounded and grow by one unit.
/// Two-digit values are rounded at the tens and grow by ten. Larger values
/// are rounded at `10^(d-2)` (with `d` the number of integer digits) and
/// grow by that magnitude.
pub fn axis_ceiling(observed_max: f64) -> f64 {
    let observed_max = if observed_max.is_finite() {
        observed_max.max(0.0)
    } else {
        0.0
    };
    let whole = observed_max.trunc();
    if whole <= UNIT_GROWTH_LIMIT {
        return round_by_first_decimal(observed_max) + 1.0;
    }

    let digits = digit_count(whole);
    let magnitude = if digits <= 2 {
        10f64.powi(digits - 1)
    } else {
        10f64.powi(digits - 2)
    };
    round_by_first_decimal(observed_max / magnitude) * magnitude + magnitude
}

/// Rounds up when the first decimal digit is at least [ROUND_UP_DIGIT],
/// otherwise rounds down.
fn round_by_first_decimal(value: f64) -> f64 {
    // The nudge keeps values like 2.8 from reading as 2.7999..
    let first_decimal = ((value * 10.0 + 1e-9).floor() as i64).rem_euclid(10);
    if first_decimal >= ROUND_UP_DIGIT {
        value.ceil()
    } else {
        value.floor()
    }
}

fn digit_count(whole: f64) -> i32 {
    let mut n = whole as u64;
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

/// The shaded normal-range band of a chart, in value-axis units.
///
/// `offset` is measured down from the top of the axis (the ceiling) to the
/// top of the band, and `height` from there down to the bottom of the band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeOverlay {
    ceiling: f64,
    height: f64,
    offset: f64,
}

impl RangeOverlay {
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Band height as a fraction of the axis ceiling
    pub fn height_fraction(&self) -> f64 {
        if self.ceiling > 0.0 {
            self.height / self.ceiling
        } else {
            0.0
        }
    }

    /// Distance from the top of the axis to the band, as a fraction of the ceiling
    pub fn offset_fraction(&self) -> f64 {
        if self.ceiling > 0.0 {
            self.offset / self.ceiling
        } else {
            0.0
        }
    }

    /// Whether there is anything to draw
    pub fn is_empty(&self) -> bool {
        self.height <= 0.0
    }
}

/// Computes the normal-range band for an axis topped at `ceiling`.
///
/// A range lying entirely above the axis yields an empty band; a range whose
/// upper bound exceeds the axis is clipped to the top of the chart.
pub fn range_overlay(ceiling: f64, range_hi: f64, range_lo: f64) -> RangeOverlay {
    if range_lo > ceiling {
        return RangeOverlay {
            ceiling,
            height: 0.0,
            offset: 0.0,
        };
    }
    if range_hi > ceiling {
        return RangeOverlay {
            ceiling,
            height: ceiling - range_lo,
            offset: 0.0,
        };
    }
    RangeOverlay {
        ceiling,
        height: range_hi - range_lo,
        offset: ceiling - range_hi,
    }
}

/// How tick values on a value axis are labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    /// Plain numbers, e.g. `0.5`, `120`
    Literal,
    /// Two significant digits with an SI prefix, e.g. `1.2k`
    Abbreviated,
}

impl TickFormat {
    /// Large axes (ceiling above 1000) get abbreviated labels
    pub fn for_ceiling(ceiling: f64) -> Self {
        if ceiling > ABBREVIATE_ABOVE {
            TickFormat::Abbreviated
        } else {
            TickFormat::Literal
        }
    }

    pub fn format(&self, value: f64) -> String {
        match self {
            TickFormat::Literal => format_literal(value),
            TickFormat::Abbreviated => format_si(value),
        }
    }
}

fn format_literal(value: f64) -> String {
    let text = format!("{value:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn format_si(value: f64) -> String {
    const PREFIXES: [&str; 5] = ["", "k", "M", "G", "T"];
    if value == 0.0 || !value.is_finite() {
        return "0.0".to_string();
    }
    let exponent = value.abs().log10().floor() as i32;
    let index = (exponent / 3).clamp(0, PREFIXES.len() as i32 - 1) as usize;
    let scaled = value / 1000f64.powi(index as i32);
    let integer_digits = scaled.abs().log10().floor() as i32 + 1;
    let decimals = (2 - integer_digits).max(0) as usize;
    format!("{scaled:.decimals$}{}", PREFIXES[index])
}
