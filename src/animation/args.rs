//! Declared animation parameters and their total coercion rules.
//!
//! Coercion never fails: a missing or unusable value resolves to the declared default and
//! numeric values are clamped into the declared bounds.

use std::collections::BTreeMap;

use serde_json::Value;

/// Named-parameter bag handed to an animation factory.
pub type Params = serde_json::Map<String, Value>;

/// Declared type of a parameter, with its default and bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArgType {
    Int {
        default: i64,
        min: Option<i64>,
        max: Option<i64>,
    },
    Float {
        default: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
    Str {
        default: &'static str,
    },
    Bool {
        default: bool,
    },
}

/// One entry of an animation's parameter table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub ty: ArgType,
}

impl ArgSpec {
    pub const fn int(name: &'static str, default: i64, min: Option<i64>, max: Option<i64>) -> Self {
        Self {
            name,
            ty: ArgType::Int { default, min, max },
        }
    }

    pub const fn float(
        name: &'static str,
        default: f64,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Self {
        Self {
            name,
            ty: ArgType::Float { default, min, max },
        }
    }

    pub const fn string(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            ty: ArgType::Str { default },
        }
    }

    pub const fn boolean(name: &'static str, default: bool) -> Self {
        Self {
            name,
            ty: ArgType::Bool { default },
        }
    }
}

/// A coerced parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl ArgType {
    /// Coerce an optional raw value. Total: every input yields a value of the declared type.
    pub fn coerce(&self, raw: Option<&Value>) -> ArgValue {
        match *self {
            Self::Int { default, min, max } => {
                let v = raw.and_then(value_as_int).unwrap_or(default);
                ArgValue::Int(clamp_opt(v, min, max))
            }
            Self::Float { default, min, max } => {
                let v = raw
                    .and_then(value_as_float)
                    .filter(|f| f.is_finite())
                    .unwrap_or(default);
                ArgValue::Float(clamp_opt_f64(v, min, max))
            }
            Self::Str { default } => ArgValue::Str(
                raw.and_then(value_as_string)
                    .unwrap_or_else(|| default.to_owned()),
            ),
            Self::Bool { default } => ArgValue::Bool(raw.and_then(value_as_bool).unwrap_or(default)),
        }
    }

    fn default_value(&self) -> ArgValue {
        self.coerce(None)
    }
}

fn clamp_opt(v: i64, min: Option<i64>, max: Option<i64>) -> i64 {
    let v = min.map_or(v, |m| v.max(m));
    max.map_or(v, |m| v.min(m))
}

fn clamp_opt_f64(v: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let v = min.map_or(v, |m| v.max(m));
    max.map_or(v, |m| v.min(m))
}

fn value_as_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn value_as_float(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn value_as_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn value_as_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        },
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Resolved parameters of one animation instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    values: BTreeMap<&'static str, ArgValue>,
}

impl Args {
    /// Resolve every declared parameter against `params`. Undeclared keys are ignored.
    pub fn resolve(specs: &[ArgSpec], params: &Params) -> Self {
        for key in params.keys() {
            if !specs.iter().any(|s| s.name == key) {
                tracing::debug!(param = %key, "ignoring undeclared animation parameter");
            }
        }
        let values = specs
            .iter()
            .map(|s| (s.name, s.ty.coerce(params.get(s.name))))
            .collect();
        Self { values }
    }

    /// Defaults only.
    pub fn defaults(specs: &[ArgSpec]) -> Self {
        Self {
            values: specs.iter().map(|s| (s.name, s.ty.default_value())).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn int(&self, name: &str) -> i64 {
        match self.values.get(name) {
            Some(ArgValue::Int(v)) => *v,
            other => undeclared(name, other).unwrap_or_default(),
        }
    }

    pub fn float(&self, name: &str) -> f64 {
        match self.values.get(name) {
            Some(ArgValue::Float(v)) => *v,
            other => undeclared(name, other).unwrap_or_default(),
        }
    }

    pub fn string(&self, name: &str) -> String {
        match self.values.get(name) {
            Some(ArgValue::Str(v)) => v.clone(),
            other => undeclared(name, other).unwrap_or_default(),
        }
    }

    pub fn boolean(&self, name: &str) -> bool {
        match self.values.get(name) {
            Some(ArgValue::Bool(v)) => *v,
            other => undeclared(name, other).unwrap_or_default(),
        }
    }
}

/// A unit read a parameter it never declared, or read it as the wrong type.
fn undeclared<T>(name: &str, found: Option<&ArgValue>) -> Option<T> {
    tracing::error!(param = name, found = ?found, "parameter read as an undeclared name or type");
    None
}

#[cfg(test)]
#[path = "../../tests/unit/animation/args.rs"]
mod tests;
