/// How tick values are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    /// Decimals follow the tick step.
    Plain,
    /// Whole percent with thousands separators, `{x:,.0f}%`.
    Percent,
}

/// Axis configuration with tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
}

impl Axis {
    /// Autoscale to the data range padded by `margin` (a fraction of the
    /// range) on both sides, with "nice number" ticks inside the limits.
    pub fn auto_linear(
        data_min: f64,
        data_max: f64,
        margin: f64,
        target_ticks: usize,
        format: TickFormat,
    ) -> Self {
        let (min, max) = padded_range(data_min, data_max, margin);
        let step = nice_step((max - min) / (target_ticks.max(2) - 1) as f64);
        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut k = (min / step).ceil();
        while k * step <= max + step * 1e-9 {
            let v = k * step;
            ticks.push(v);
            labels.push(format_tick(v, step, format));
            k += 1.0;
        }
        Self { min, max, label: String::new(), tick_positions: ticks, tick_labels: labels }
    }

    /// Categorical axis: one labelled tick per category at `0, 1, 2, ...`,
    /// with half a slot of room at both ends.
    pub fn categorical(labels: &[String]) -> Self {
        Self {
            min: -0.5,
            max: labels.len() as f64 - 0.5,
            label: String::new(),
            tick_positions: (0..labels.len()).map(|i| i as f64).collect(),
            tick_labels: labels.to_vec(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = (value - self.min) / (self.max - self.min);
        px_min + frac * (px_max - px_min)
    }
}

fn padded_range(data_min: f64, data_max: f64, margin: f64) -> (f64, f64) {
    let (lo, hi) = if data_min <= data_max { (data_min, data_max) } else { (data_max, data_min) };
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let range = hi - lo;
    if range.abs() < 1e-15 {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.05 };
        return (lo - pad, hi + pad);
    }
    (lo - margin * range, hi + margin * range)
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64, format: TickFormat) -> String {
    // Avoid "-0"
    let value = if value.abs() < step * 1e-6 { 0.0 } else { value };
    match format {
        TickFormat::Percent => format!("{}%", group_thousands(value.round() as i64)),
        TickFormat::Plain => {
            let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
            if decimals == 0 {
                group_thousands(value.round() as i64)
            } else {
                format!("{:.prec$}", value, prec = decimals)
            }
        }
    }
}

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(v: i64) -> String {
    let digits = v.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if v < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_linear_pads_the_data_range() {
        let ax = Axis::auto_linear(2.0, 51.0, 0.05, 8, TickFormat::Plain);
        assert!((ax.min - (2.0 - 2.45)).abs() < 1e-12);
        assert!((ax.max - (51.0 + 2.45)).abs() < 1e-12);
        assert_eq!(ax.tick_labels.first().map(String::as_str), Some("0"));
        assert!(ax.tick_positions.iter().all(|&t| t >= ax.min && t <= ax.max));
    }

    #[test]
    fn data_to_pixel_linear() {
        let ax = Axis::auto_linear(0.0, 100.0, 0.0, 5, TickFormat::Plain);
        let px = ax.data_to_pixel(50.0, 0.0, 500.0);
        assert!((px - 250.0).abs() < 1e-9);
        // Inverted pixel range (y axes).
        assert!((ax.data_to_pixel(100.0, 400.0, 0.0)).abs() < 1e-9);
    }

    #[test]
    fn nice_step_values() {
        assert!((nice_step(3.2) - 2.0).abs() < 1e-9);
        assert!((nice_step(0.7) - 0.5).abs() < 1e-9);
        assert!((nice_step(15.0) - 10.0).abs() < 1e-9);
        assert!((nice_step(4.5) - 5.0).abs() < 1e-9);
        assert!((nice_step(1.2) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn percent_ticks() {
        let ax = Axis::auto_linear(-82.53, 16.14, 0.05, 8, TickFormat::Percent);
        assert!(ax.tick_labels.contains(&"-80%".to_string()));
        assert!(ax.tick_labels.contains(&"0%".to_string()));
        assert!(!ax.tick_labels.iter().any(|l| l == "-0%"));
        assert_eq!(format_tick(1500.0, 500.0, TickFormat::Percent), "1,500%");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(60_000), "60,000");
        assert_eq!(group_thousands(-1_234_567), "-1,234,567");
    }

    #[test]
    fn degenerate_ranges() {
        let flat = Axis::auto_linear(5.0, 5.0, 0.05, 5, TickFormat::Plain);
        assert!(flat.min < 5.0 && flat.max > 5.0);
        let empty = Axis::auto_linear(f64::INFINITY, f64::NEG_INFINITY, 0.05, 5, TickFormat::Plain);
        assert_eq!((empty.min, empty.max), (0.0, 1.0));
    }

    #[test]
    fn categorical_slots() {
        let labels = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let ax = Axis::categorical(&labels);
        assert_eq!((ax.min, ax.max), (-0.5, 2.5));
        assert_eq!(ax.tick_positions, [0.0, 1.0, 2.0]);
    }
}
