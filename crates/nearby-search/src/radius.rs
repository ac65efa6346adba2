//! Search radius normalization.

use nearby_core::RadiusBound;

use crate::criteria::SearchCriteria;

/// Formats a radius the way the radius control displays it (`10`, `2.5`).
#[must_use]
pub fn format_radius(km: f64) -> String {
    format!("{km}")
}

/// Keeps the displayed radius and the stored radius identical and in bounds.
///
/// This never rejects input: unparsable or non-finite text falls back to the
/// configured default, and everything is clamped into `[min, max]`.
#[derive(Debug, Clone)]
pub struct RadiusController {
    bound: RadiusBound,
    displayed: String,
}

impl RadiusController {
    #[must_use]
    pub fn new(bound: RadiusBound) -> Self {
        Self {
            bound,
            displayed: format_radius(bound.clamp(bound.default)),
        }
    }

    #[must_use]
    pub fn bound(&self) -> RadiusBound {
        self.bound
    }

    /// The text currently shown in the radius control.
    #[must_use]
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    /// Replaces the displayed text without committing it, as when a form is
    /// restored from history. The next [`RadiusController::current`] call
    /// normalizes it.
    pub fn restore_displayed(&mut self, raw: &str) {
        self.displayed = raw.to_string();
    }

    /// Parses and clamps `raw`, writing the normalized value back to the
    /// display when it differs.
    pub fn clamp(&mut self, raw: &str) -> f64 {
        let parsed = raw.trim().parse::<f64>().unwrap_or(f64::NAN);
        let value = self.bound.clamp(parsed);
        let shown = format_radius(value);
        if shown != raw {
            tracing::debug!(raw, normalized = %shown, "radius rewritten to keep display in sync");
        }
        self.displayed = shown;
        value
    }

    /// Re-clamps whatever is currently displayed.
    pub fn current(&mut self) -> f64 {
        let displayed = self.displayed.clone();
        self.clamp(&displayed)
    }

    /// Clamps `raw` and stores the result in `criteria`.
    pub fn commit(&mut self, raw: &str, criteria: &mut SearchCriteria) -> f64 {
        let value = self.clamp(raw);
        criteria.set_radius_km(value);
        value
    }

    /// Re-clamps the displayed value and stores it in `criteria`.
    pub fn commit_current(&mut self, criteria: &mut SearchCriteria) -> f64 {
        let value = self.current();
        criteria.set_radius_km(value);
        value
    }
}
