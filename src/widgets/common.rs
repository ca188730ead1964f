//! Helpers shared by the concrete widgets

use crate::theme::{keys, Color, ThemeProvider};
use crate::types::Dataset;

/// Whether a reading is in alarm. A zero threshold disables the alarm.
pub fn alarm_triggered(value: f64, threshold: f64) -> bool {
    threshold != 0.0 && value >= threshold
}

/// LED state: with a threshold the LED follows the alarm rule, without one
/// any non-zero reading lights it.
pub fn led_lit(value: f64, threshold: f64) -> bool {
    if threshold != 0.0 {
        value >= threshold
    } else {
        value != 0.0
    }
}

/// `"<value> <units>"` with the shared precision; text values verbatim
pub fn value_with_units(dataset: &Dataset, precision: usize) -> String {
    let value = dataset.value.display(precision);
    if dataset.units.is_empty() {
        value
    } else {
        format!("{} {}", value, dataset.units)
    }
}

/// Unit label shown next to a grid value, `[u]` or empty
pub fn unit_label(units: &str) -> String {
    if units.is_empty() {
        String::new()
    } else {
        format!("[{}]", units)
    }
}

/// Store `value` into `slot`, reporting whether it differed
pub fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// Float equality for change detection: NaN equals NaN and `-0.0` differs
/// from `0.0`, so a stuck NaN reading does not repaint forever.
pub fn same_f64(a: f64, b: f64) -> bool {
    a.total_cmp(&b).is_eq()
}

/// [`replace`] for a float reading
pub fn replace_f64(slot: &mut f64, value: f64) -> bool {
    if same_f64(*slot, value) {
        false
    } else {
        *slot = value;
        true
    }
}

/// Pointwise [`same_f64`] over plot points
pub fn same_points(a: &[(f64, f64)], b: &[(f64, f64)]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(p, q)| same_f64(p.0, q.0) && same_f64(p.1, q.1))
}

/// [`replace`] for a series of plot points
pub fn replace_points(slot: &mut Vec<(f64, f64)>, value: &[(f64, f64)]) -> bool {
    if same_points(slot, value) {
        false
    } else {
        slot.clear();
        slot.extend_from_slice(value);
        true
    }
}

/// Semantic colors a widget paints its chrome with
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WidgetPalette {
    pub base: Option<Color>,
    pub window: Option<Color>,
    pub text: Option<Color>,
    pub highlight: Option<Color>,
    pub background: Option<Color>,
    pub border: Option<Color>,
    pub alarm: Option<Color>,
}

impl WidgetPalette {
    pub fn from_theme(theme: &ThemeProvider) -> Self {
        Self {
            base: theme.color(keys::WIDGET_BASE),
            window: theme.color(keys::WIDGET_WINDOW),
            text: theme.color(keys::WIDGET_TEXT),
            highlight: theme.color(keys::WIDGET_HIGHLIGHT),
            background: theme.color(keys::GROUPBOX_BACKGROUND),
            border: theme.color(keys::GROUPBOX_HARD_BORDER),
            alarm: theme.color(keys::ALARM),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_alarm_threshold() {
        assert!(alarm_triggered(80.0, 80.0));
        assert!(alarm_triggered(95.5, 80.0));
        assert!(!alarm_triggered(79.9, 80.0));
        assert!(!alarm_triggered(1000.0, 0.0));
        assert!(alarm_triggered(-5.0, -10.0));
    }

    #[test]
    fn test_led_state() {
        assert!(led_lit(1.0, 0.0));
        assert!(!led_lit(0.0, 0.0));
        assert!(led_lit(-1.0, 0.0));
        assert!(!led_lit(4.0, 5.0));
        assert!(led_lit(5.0, 5.0));
    }

    #[test]
    fn test_value_formatting() {
        let ds = Dataset::new("T", 21.456).with_units("°C");
        assert_eq!(value_with_units(&ds, 2), "21.46 °C");
        assert_eq!(value_with_units(&Dataset::new("s", "idle"), 2), "idle");
        assert_eq!(value_with_units(&Dataset::new("n", "3"), 1), "3.0");
        assert_eq!(unit_label("V"), "[V]");
        assert_eq!(unit_label(""), "");
    }

    #[test]
    fn test_replace_reports_change() {
        let mut v = 1;
        assert!(!replace(&mut v, 1));
        assert!(replace(&mut v, 2));
        assert_eq!(v, 2);
    }

    #[test]
    fn test_nan_readings_settle() {
        let mut level = 1.0;
        assert!(replace_f64(&mut level, f64::NAN));
        assert!(!replace_f64(&mut level, f64::NAN));
        assert!(replace_f64(&mut level, 2.0));

        let mut points = vec![(0.0, 1.0)];
        let stuck = [(0.0, f64::NAN), (1.0, f64::NEG_INFINITY)];
        assert!(replace_points(&mut points, &stuck));
        assert!(!replace_points(&mut points, &stuck));
        assert!(same_points(&points, &stuck));
        assert!(!same_points(&points, &stuck[..1]));
    }

    proptest! {
        #[test]
        fn prop_zero_threshold_never_alarms(v in proptest::num::f64::ANY) {
            prop_assert!(!alarm_triggered(v, 0.0));
        }

        #[test]
        fn prop_alarm_matches_comparison(v in -1e6f64..1e6, t in -1e6f64..1e6) {
            prop_assume!(t != 0.0);
            prop_assert_eq!(alarm_triggered(v, t), v >= t);
        }
    }
}
