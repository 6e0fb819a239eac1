//! Dependency declaration
//!
//! Two ordered name lists: build inputs (tools used while building, such as
//! `pkg-config`) and runtime inputs (libraries that must be found by the
//! dynamic loader). Nothing is resolved here; names are checked when the
//! environment is composed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which list a dependency belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Build,
    Runtime,
}

/// Declared build and runtime inputs, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyList {
    #[serde(rename = "build")]
    pub build_inputs: Vec<String>,

    #[serde(rename = "runtime")]
    pub runtime_inputs: Vec<String>,
}

impl DependencyList {
    pub fn new<B, R>(build: B, runtime: R) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            build_inputs: build.into_iter().map(Into::into).collect(),
            runtime_inputs: runtime.into_iter().map(Into::into).collect(),
        }
    }

    pub fn inputs(&self, kind: DependencyKind) -> &[String] {
        match kind {
            DependencyKind::Build => &self.build_inputs,
            DependencyKind::Runtime => &self.runtime_inputs,
        }
    }

    /// Every declared name, build inputs first, each listed once
    pub fn declared(&self) -> Vec<String> {
        dedup_first_occurrence(
            self.build_inputs
                .iter()
                .chain(self.runtime_inputs.iter())
                .cloned(),
        )
    }
}

/// Declare `names` as a single list of the given kind
pub fn declare<I, S>(names: I, kind: DependencyKind) -> DependencyList
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    match kind {
        DependencyKind::Build => DependencyList {
            build_inputs: names,
            runtime_inputs: Vec::new(),
        },
        DependencyKind::Runtime => DependencyList {
            build_inputs: Vec::new(),
            runtime_inputs: names,
        },
    }
}

/// Drop repeated items, keeping each at its first position
pub fn dedup_first_occurrence<T, I>(items: I) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + std::hash::Hash + Clone,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
