//! Band, point and linear scales.

/// Maps a finite category list onto evenly spaced, equally wide bands.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Builds a centered band scale with equal inner and outer `padding`.
    pub fn new(domain: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let n = domain.len() as f64;
        let (r0, r1) = range;
        let step = (r1 - r0) / (n - padding + 2.0 * padding).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;
        Self {
            domain,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Left edge of the band for `category`.
    pub fn position(&self, category: &str) -> Option<f64> {
        self.index_of(category).map(|i| self.start + self.step * i as f64)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    fn index_of(&self, category: &str) -> Option<usize> {
        self.domain.iter().position(|c| c == category)
    }
}

/// Maps an ordered category list onto discrete, evenly spaced positions.
#[derive(Debug, Clone, PartialEq)]
pub struct PointScale {
    domain: Vec<String>,
    start: f64,
    step: f64,
}

impl PointScale {
    pub fn new(domain: Vec<String>, range: (f64, f64)) -> Self {
        let n = domain.len() as f64;
        let (r0, r1) = range;
        let step = (r1 - r0) / (n - 1.0).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - 1.0)) * 0.5;
        Self {
            domain,
            start,
            step,
        }
    }

    pub fn position(&self, category: &str) -> Option<f64> {
        self.domain
            .iter()
            .position(|c| c == category)
            .map(|i| self.start + self.step * i as f64)
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }
}

/// Continuous mapping from `[d0, d1]` onto `[r0, r1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Value scale for a chart: domain `[0, max]`, pixel range inverted so
    /// larger values sit higher. A non-positive or non-finite `max` falls back
    /// to `[0, 1]`.
    pub fn zero_based(max: f64, range: (f64, f64)) -> Self {
        let max = if max.is_finite() && max > 0.0 { max } else { 1.0 };
        Self {
            domain: (0.0, max),
            range,
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Roughly `count` round tick values covering the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = self.domain;
        let step = tick_step(start, stop, count);
        if step <= 0.0 || !step.is_finite() {
            return vec![start];
        }
        let first = (start / step).ceil() as i64;
        let last = (stop / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

// 1, 2 or 5 × 10^k, whichever yields closest to `count` ticks
fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start) / count.max(1) as f64;
    if raw <= 0.0 {
        return 0.0;
    }
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

/// Tick label for a linear axis: integers without decimals, otherwise the
/// shortest representation.
pub fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.6}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_band_scale_padding() {
        let scale = BandScale::new(labels(&["a", "b"]), (50.0, 770.0), 0.1);

        // step = 720 / (2 - 0.1 + 0.2)
        let step = 720.0 / 2.1;
        assert!((scale.step() - step).abs() < 1e-9);
        assert!((scale.bandwidth() - step * 0.9).abs() < 1e-9);
        assert!((scale.position("a").unwrap() - (50.0 + step * 0.1)).abs() < 1e-9);
        assert!((scale.position("b").unwrap() - (50.0 + step * 1.1)).abs() < 1e-9);
        assert_eq!(scale.position("c"), None);
    }

    #[test]
    fn test_point_scale_spreads_to_edges() {
        let scale = PointScale::new(labels(&["x", "y", "z"]), (50.0, 770.0));

        assert_eq!(scale.position("x"), Some(50.0));
        assert_eq!(scale.position("y"), Some(410.0));
        assert_eq!(scale.position("z"), Some(770.0));
    }

    #[test]
    fn test_point_scale_single_category_is_centered() {
        let scale = PointScale::new(labels(&["only"]), (50.0, 770.0));
        assert_eq!(scale.position("only"), Some(410.0));
    }

    #[test]
    fn test_linear_scale_inverts_range() {
        let scale = LinearScale::zero_based(200.0, (350.0, 20.0));

        assert_eq!(scale.apply(0.0), 350.0);
        assert_eq!(scale.apply(200.0), 20.0);
        assert_eq!(scale.apply(100.0), 185.0);
    }

    #[test]
    fn test_degenerate_domain_falls_back() {
        let scale = LinearScale::zero_based(0.0, (350.0, 20.0));
        assert_eq!(scale.domain(), (0.0, 1.0));
        assert_eq!(scale.apply(0.0), 350.0);
    }

    #[test]
    fn test_ticks_are_round() {
        let scale = LinearScale::zero_based(350.0, (350.0, 20.0));
        assert_eq!(scale.ticks(5), vec![0.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0, 350.0]);

        let scale = LinearScale::zero_based(1.0, (350.0, 20.0));
        assert_eq!(scale.ticks(5).len(), 6);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(150.0), "150");
        assert_eq!(format_tick(0.2), "0.2");
    }
}
