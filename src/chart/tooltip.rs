//! Hover tooltip state, local to one chart.

use serde::Serialize;

/// Offset of the tooltip box from the pointer.
const OFFSET_X: f64 = 10.0;
const OFFSET_Y: f64 = -10.0;

/// Chart geometry that can resolve a pointer position to one of its shapes.
pub trait HitTest {
    /// Index of the shape under `(x, y)`, in chart coordinates.
    fn hit(&self, x: f64, y: f64) -> Option<usize>;

    /// Tooltip lines for the shape at `index`.
    fn describe(&self, index: usize) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Over { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Out,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tooltip {
    pub visible: bool,
    pub target: Option<usize>,
    pub left: f64,
    pub top: f64,
    pub lines: Vec<String>,
}

impl Tooltip {
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Next tooltip state after `event` on `chart`.
    ///
    /// Content is rebuilt from the chart every time the pointer enters a
    /// shape; moving within the same shape only repositions the box.
    pub fn handle<C: HitTest>(&self, chart: &C, event: PointerEvent) -> Tooltip {
        match event {
            PointerEvent::Out => Tooltip::hidden(),
            PointerEvent::Over { x, y } => Self::show(chart, x, y),
            PointerEvent::Move { x, y } => match chart.hit(x, y) {
                Some(index) if self.visible && self.target == Some(index) => Tooltip {
                    left: x + OFFSET_X,
                    top: y + OFFSET_Y,
                    ..self.clone()
                },
                Some(_) => Self::show(chart, x, y),
                None => Tooltip::hidden(),
            },
        }
    }

    fn show<C: HitTest>(chart: &C, x: f64, y: f64) -> Tooltip {
        match chart.hit(x, y) {
            Some(index) => Tooltip {
                visible: true,
                target: Some(index),
                left: x + OFFSET_X,
                top: y + OFFSET_Y,
                lines: chart.describe(index),
            },
            None => Tooltip::hidden(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Halves;

    impl HitTest for Halves {
        fn hit(&self, x: f64, _y: f64) -> Option<usize> {
            match x {
                x if (0.0..50.0).contains(&x) => Some(0),
                x if (50.0..100.0).contains(&x) => Some(1),
                _ => None,
            }
        }

        fn describe(&self, index: usize) -> Vec<String> {
            vec![format!("half {}", index)]
        }
    }

    #[test]
    fn test_over_move_out() {
        let tip = Tooltip::hidden().handle(&Halves, PointerEvent::Over { x: 10.0, y: 30.0 });
        assert!(tip.visible);
        assert_eq!(tip.lines, vec!["half 0"]);
        assert_eq!((tip.left, tip.top), (20.0, 20.0));

        let tip = tip.handle(&Halves, PointerEvent::Move { x: 20.0, y: 40.0 });
        assert_eq!(tip.target, Some(0));
        assert_eq!((tip.left, tip.top), (30.0, 30.0));

        let tip = tip.handle(&Halves, PointerEvent::Move { x: 60.0, y: 40.0 });
        assert_eq!(tip.lines, vec!["half 1"]);

        let tip = tip.handle(&Halves, PointerEvent::Out);
        assert_eq!(tip, Tooltip::hidden());
    }

    #[test]
    fn test_miss_hides() {
        let tip = Tooltip::hidden().handle(&Halves, PointerEvent::Over { x: 500.0, y: 0.0 });
        assert!(!tip.visible);
    }
}
