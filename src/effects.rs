use std::collections::BTreeMap;

use crate::types::{EffectKind, EffectView};

#[derive(Clone, Debug, Default)]
pub struct EffectManager {
    active: BTreeMap<EffectKind, u64>,
}

impl EffectManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self, kind: EffectKind, duration_ms: u64, now_ms: u64) -> u64 {
        let expires_at = now_ms.saturating_add(duration_ms);
        self.active.insert(kind, expires_at);
        expires_at
    }

    /// Drops every effect whose deadline is `<= now_ms` and returns the kinds
    /// that ended, in kind order.
    pub fn tick(&mut self, now_ms: u64) -> Vec<EffectKind> {
        let expired: Vec<EffectKind> = self
            .active
            .iter()
            .filter(|(_, expires_at)| **expires_at <= now_ms)
            .map(|(kind, _)| *kind)
            .collect();
        for kind in &expired {
            self.active.remove(kind);
        }
        expired
    }

    pub fn is_active(&self, kind: EffectKind, now_ms: u64) -> bool {
        self.active
            .get(&kind)
            .is_some_and(|expires_at| now_ms < *expires_at)
    }

    pub fn expires_at(&self, kind: EffectKind) -> Option<u64> {
        self.active.get(&kind).copied()
    }

    pub fn views(&self) -> Vec<EffectView> {
        self.active
            .iter()
            .map(|(kind, expires_at)| EffectView {
                kind: *kind,
                expires_at_ms: *expires_at,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
