//! Enabled flags for the registered transforms.

use crate::transform::TransformKind;
use std::collections::BTreeMap;

/// Mapping from transform to enabled flag.
///
/// This is the single source of truth for which toggles are on; the shell
/// derives button highlighting from [`TransformState::active`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformState {
    enabled: BTreeMap<TransformKind, bool>,
}

impl TransformState {
    /// All transforms disabled.
    pub fn new() -> Self {
        Self {
            enabled: TransformKind::ALL.into_iter().map(|kind| (kind, false)).collect(),
        }
    }

    /// Flips the flag and returns the new value.
    pub fn toggle(&mut self, kind: TransformKind) -> bool {
        let flag = self.enabled.entry(kind).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn set(&mut self, kind: TransformKind, enabled: bool) {
        self.enabled.insert(kind, enabled);
    }

    pub fn is_enabled(&self, kind: TransformKind) -> bool {
        self.enabled.get(&kind).copied().unwrap_or(false)
    }

    /// Enabled transforms in canonical order.
    pub fn active(&self) -> Vec<TransformKind> {
        self.enabled
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(kind, _)| *kind)
            .collect()
    }

    pub fn clear(&mut self) {
        for flag in self.enabled.values_mut() {
            *flag = false;
        }
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new()
    }
}
