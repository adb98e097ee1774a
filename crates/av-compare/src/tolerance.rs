//! Per-metric tolerance rules, built once from the plan's `tolerances`
//! mapping and immutable thereafter.

use std::collections::HashMap;

use av_plan::Value;

pub const DEFAULT_ABS_TOL: f64 = 1e-9;
pub const DEFAULT_REL_TOL: f64 = 1e-3;

/// Allowance for one metric: absolute plus relative slack, with
/// optional lower and upper bounds on the measured value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub abs: f64,
    pub rel: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            abs: DEFAULT_ABS_TOL,
            rel: DEFAULT_REL_TOL,
        }
    }
}

impl Tolerance {
    /// Build from a plan mapping like `{min: 0.0, max: 1.0, abs: 1e-6}`.
    /// Missing keys keep their defaults; a non-mapping spec keeps all of
    /// them.
    pub fn from_value(spec: &Value) -> Self {
        let Some(map) = spec.as_mapping() else {
            return Self::default();
        };
        Self {
            min: map.get("min").and_then(Value::as_f64),
            max: map.get("max").and_then(Value::as_f64),
            abs: map
                .get("abs")
                .and_then(Value::as_f64)
                .unwrap_or(DEFAULT_ABS_TOL),
            rel: map
                .get("rel")
                .and_then(Value::as_f64)
                .unwrap_or(DEFAULT_REL_TOL),
        }
    }
}

/// Tolerance rules keyed by metric name.
#[derive(Debug, Clone, Default)]
pub struct ToleranceTable {
    rules: HashMap<String, Tolerance>,
}

impl ToleranceTable {
    /// Collect the plan's top-level `tolerances` mapping. A plan
    /// without one yields an empty table: every metric then resolves to
    /// the default rule.
    pub fn from_plan(plan: &Value) -> Self {
        let mut rules = HashMap::new();
        if let Some(raw) = plan.get("tolerances").and_then(Value::as_mapping) {
            for (name, spec) in raw {
                rules.insert(name.clone(), Tolerance::from_value(spec));
            }
        }
        Self { rules }
    }

    /// Rule for `metric`, falling back to the default rule.
    pub fn get(&self, metric: &str) -> Tolerance {
        self.rules.get(metric).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
