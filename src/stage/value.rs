use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// A value produced by compile-time code, detached from the interpreter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StagedValue {
    Nil,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(Vec<u8>),
    Table(StagedTable),
    /// Anything that has no literal form: functions, userdata, threads,
    /// tables that contain themselves.
    Opaque { type_name: String },
}

impl StagedValue {
    pub fn type_name(&self) -> &str {
        match self {
            StagedValue::Nil => "nil",
            StagedValue::Boolean(_) => "boolean",
            StagedValue::Integer(_) | StagedValue::Number(_) => "number",
            StagedValue::String(_) => "string",
            StagedValue::Table(_) => "table",
            StagedValue::Opaque { type_name } => type_name,
        }
    }

    /// Key order used when a table's hash part is written out: booleans,
    /// then numbers, then strings, then everything else.
    pub fn key_order(&self, other: &StagedValue) -> Ordering {
        fn rank(value: &StagedValue) -> u8 {
            match value {
                StagedValue::Boolean(_) => 0,
                StagedValue::Integer(_) | StagedValue::Number(_) => 1,
                StagedValue::String(_) => 2,
                _ => 3,
            }
        }

        match (self, other) {
            (StagedValue::Boolean(a), StagedValue::Boolean(b)) => a.cmp(b),
            (StagedValue::String(a), StagedValue::String(b)) => a.cmp(b),
            (StagedValue::Integer(a), StagedValue::Integer(b)) => a.cmp(b),
            (a, b) if rank(a) == 1 && rank(b) == 1 => {
                a.as_f64().total_cmp(&b.as_f64())
            }
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            StagedValue::Integer(i) => *i as f64,
            StagedValue::Number(n) => *n,
            _ => 0.0,
        }
    }
}

impl fmt::Display for StagedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StagedValue::Nil => write!(f, "nil"),
            StagedValue::Boolean(b) => write!(f, "{b}"),
            StagedValue::Integer(i) => write!(f, "{i}"),
            StagedValue::Number(n) => write!(f, "{n:?}"),
            StagedValue::String(s) => write!(f, "{:?}", String::from_utf8_lossy(s)),
            StagedValue::Table(t) => write!(f, "table({} entries)", t.len()),
            StagedValue::Opaque { type_name } => write!(f, "<{type_name}>"),
        }
    }
}

/// Snapshot of a table: the sequence `t[1..n]` and the remaining pairs
/// sorted with [`StagedValue::key_order`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StagedTable {
    pub array: Vec<StagedValue>,
    pub hash: Vec<(StagedValue, StagedValue)>,
}

impl StagedTable {
    /// Splits raw key/value pairs into the array and hash parts.
    pub fn from_pairs(pairs: Vec<(StagedValue, StagedValue)>) -> Self {
        let mut by_index: IndexMap<i64, StagedValue> = IndexMap::new();
        let mut hash = Vec::new();
        for (key, value) in pairs {
            match key {
                StagedValue::Integer(i) if i >= 1 => {
                    by_index.insert(i, value);
                }
                _ => hash.push((key, value)),
            }
        }

        let mut array = Vec::new();
        let mut next = 1;
        while let Some(value) = by_index.swap_remove(&next) {
            array.push(value);
            next += 1;
        }
        hash.extend(
            by_index
                .into_iter()
                .map(|(i, value)| (StagedValue::Integer(i), value)),
        );
        hash.sort_by(|(a, _), (b, _)| a.key_order(b));

        Self { array, hash }
    }

    pub fn len(&self) -> usize {
        self.array.len() + self.hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The values staged for one runtime module, in ordinal order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StagedModule {
    pub values: Vec<StagedValue>,
}

/// Output of the stage evaluator: staged values per runtime module, in
/// module discovery order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StagedResultTable {
    modules: IndexMap<String, StagedModule>,
}

impl StagedResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: impl Into<String>, values: Vec<StagedValue>) {
        self.modules.insert(module.into(), StagedModule { values });
    }

    /// Values for `module`; a module without call sites has none.
    pub fn values(&self, module: &str) -> &[StagedValue] {
        self.modules
            .get(module)
            .map(|m| m.values.as_slice())
            .unwrap_or_default()
    }

    pub fn modules(&self) -> impl Iterator<Item = (&str, &[StagedValue])> {
        self.modules
            .iter()
            .map(|(id, m)| (id.as_str(), m.values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
