//! Completion time and cost estimation.
//!
//! A display heuristic, not a model: every provider gets a linear function of
//! the input length. `time = base + length × factor`, shown as the range
//! `[time, time × 1.5]`. A priority multiplier divides time and multiplies cost.

use serde::Serialize;

/// Shown when there is nothing to estimate yet.
pub const PLACEHOLDER: &str = "5 - 10 seconds";

/// Upper bound of the displayed range relative to the lower one.
pub const HIGH_FACTOR: f64 = 1.5;

/// Ranges whose upper bound reaches this many seconds are shown in minutes.
const MINUTES_THRESHOLD_SECS: f64 = 120.0;

/// Linear estimation parameters for one provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProviderProfile {
    /// Provider label as shown in the form.
    pub name: &'static str,
    /// Fixed overhead in seconds.
    pub base_secs: f64,
    /// Seconds added per input character.
    pub secs_per_char: f64,
    /// Cost in credits per estimated second.
    pub cost_per_sec: f64,
}

/// Known providers.
pub const PROVIDERS: &[ProviderProfile] = &[
    ProviderProfile {
        name: "IBM Quantum",
        base_secs: 25.0,
        secs_per_char: 0.15,
        cost_per_sec: 0.10,
    },
    ProviderProfile {
        name: "Google Quantum",
        base_secs: 15.0,
        secs_per_char: 0.1,
        cost_per_sec: 0.12,
    },
    ProviderProfile {
        name: "Amazon Braket",
        base_secs: 20.0,
        secs_per_char: 0.2,
        cost_per_sec: 0.08,
    },
];

/// Bucket used for any provider not in [`PROVIDERS`].
pub const DEFAULT_PROFILE: ProviderProfile = ProviderProfile {
    name: "Default",
    base_secs: 20.0,
    secs_per_char: 0.15,
    cost_per_sec: 0.10,
};

impl ProviderProfile {
    /// Look up a provider by name (case-insensitive), falling back to
    /// [`DEFAULT_PROFILE`].
    pub fn lookup(name: &str) -> &'static ProviderProfile {
        let name = name.trim();
        PROVIDERS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .unwrap_or(&DEFAULT_PROFILE)
    }

    pub fn is_known(name: &str) -> bool {
        let name = name.trim();
        PROVIDERS.iter().any(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// Estimated time and cost range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    /// Profile the numbers were computed from.
    pub profile: &'static str,
    pub low_secs: f64,
    pub high_secs: f64,
    pub low_cost: f64,
    pub high_cost: f64,
    /// Effective multiplier (1.0 when none or invalid was given).
    pub priority: f64,
}

impl Estimate {
    /// Time range, e.g. `25 - 38 seconds` or `3 - 5 minutes`.
    pub fn time_display(&self) -> String {
        if self.high_secs >= MINUTES_THRESHOLD_SECS {
            format!(
                "{} - {} minutes",
                (self.low_secs / 60.0).round(),
                (self.high_secs / 60.0).round()
            )
        } else {
            format!("{} - {} seconds", self.low_secs.round(), self.high_secs.round())
        }
    }

    /// Cost range, e.g. `$2.50 - $3.75`.
    pub fn cost_display(&self) -> String {
        format!("${:.2} - ${:.2}", self.low_cost, self.high_cost)
    }
}

/// Estimate for `provider` given an input of `input_len` characters.
pub fn estimate(provider: &str, input_len: usize, priority: Option<f64>) -> Estimate {
    let profile = ProviderProfile::lookup(provider);
    let priority = priority
        .filter(|m| m.is_finite() && *m > 0.0)
        .unwrap_or(1.0);

    let raw_secs = profile.base_secs + input_len as f64 * profile.secs_per_char;
    let low_secs = raw_secs / priority;
    let low_cost = raw_secs * profile.cost_per_sec * priority;

    Estimate {
        profile: profile.name,
        low_secs,
        high_secs: low_secs * HIGH_FACTOR,
        low_cost,
        high_cost: low_cost * HIGH_FACTOR,
        priority,
    }
}

/// Time display for the form: the placeholder when either input is absent.
pub fn estimate_display(provider: Option<&str>, input: &str) -> String {
    match provider {
        Some(p) if !p.trim().is_empty() && !input.is_empty() => {
            estimate(p, input.chars().count(), None).time_display()
        }
        _ => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ibm_zero_length() {
        let e = estimate("IBM Quantum", 0, None);
        assert_eq!(e.low_secs, 25.0);
        assert_eq!(e.high_secs, 37.5);
        assert_eq!(e.time_display(), "25 - 38 seconds");
    }

    #[test]
    fn test_linear_in_length() {
        let e = estimate("Google Quantum", 100, None);
        assert!((e.low_secs - 25.0).abs() < 1e-9);
        assert!((e.high_secs - 37.5).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_provider_uses_default_bucket() {
        let e = estimate("Rigetti", 0, None);
        assert_eq!(e.profile, "Default");
        assert_eq!(e.low_secs, DEFAULT_PROFILE.base_secs);
        assert!(!ProviderProfile::is_known("Rigetti"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(ProviderProfile::lookup("amazon braket").name, "Amazon Braket");
    }

    #[test]
    fn test_priority_divides_time_and_multiplies_cost() {
        let base = estimate("IBM Quantum", 0, None);
        let fast = estimate("IBM Quantum", 0, Some(2.0));
        assert!((fast.low_secs - base.low_secs / 2.0).abs() < 1e-9);
        assert!((fast.low_cost - base.low_cost * 2.0).abs() < 1e-9);
        assert_eq!(base.cost_display(), "$2.50 - $3.75");
    }

    #[test]
    fn test_invalid_priority_is_ignored() {
        let base = estimate("IBM Quantum", 10, None);
        assert_eq!(estimate("IBM Quantum", 10, Some(0.0)), base);
        assert_eq!(estimate("IBM Quantum", 10, Some(f64::NAN)), base);
        assert_eq!(estimate("IBM Quantum", 10, Some(-3.0)), base);
    }

    #[test]
    fn test_minutes_display() {
        // 20 + 1000 * 0.2 = 220 s -> 330 s high
        let e = estimate("Amazon Braket", 1000, None);
        assert_eq!(e.time_display(), "4 - 6 minutes");
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(estimate_display(None, "something"), PLACEHOLDER);
        assert_eq!(estimate_display(Some("IBM Quantum"), ""), PLACEHOLDER);
        assert_eq!(estimate_display(Some(""), "abc"), PLACEHOLDER);
        assert_eq!(estimate_display(Some("IBM Quantum"), "x"), "25 - 38 seconds");
    }
}
