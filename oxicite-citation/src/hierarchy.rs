//! Citation hierarchy state machine.
//!
//! Folds the ordered token stream of one author into the six-level
//! citation state and captures a [`CitationSnapshot`] for every literal
//! text line.
//!
//! # Reset cascade
//!
//! Setting, incrementing or appending to level `L` resets every level
//! below `L` to 1: a new book restarts its line count.

use crate::anomaly::DecodeAnomaly;
use crate::token::CitationToken;
use oxicite_core::{CitationValue, HIERARCHY_DEPTH};
use std::collections::BTreeMap;

/// Level labels of one work, depth → label (`0 → "line"`).
pub type LevelLabels = BTreeMap<u8, String>;

/// Immutable capture of the citation state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CitationSnapshot {
    /// Work number at capture time.
    pub work: u16,
    /// Level values, index 0 is the innermost level.
    pub levels: [CitationValue; HIERARCHY_DEPTH],
}

impl CitationSnapshot {
    /// Value of level `depth`.
    pub fn level(&self, depth: usize) -> Option<&CitationValue> {
        self.levels.get(depth)
    }

    /// Render the innermost `depth` levels, outermost first (`"2.14"`).
    pub fn citation(&self, depth: usize) -> String {
        let depth = depth.clamp(1, HIERARCHY_DEPTH);
        self.levels[..depth]
            .iter()
            .rev()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Stateful citation tracker for a single author pass.
#[derive(Debug, Clone)]
pub struct HierarchyStateMachine {
    levels: [CitationValue; HIERARCHY_DEPTH],
    work: u16,
    labels: BTreeMap<u16, LevelLabels>,
    diagnostics: Vec<DecodeAnomaly>,
}

impl Default for HierarchyStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyStateMachine {
    /// Create a state machine with every level at 1 and work number 0.
    pub fn new() -> Self {
        Self {
            levels: std::array::from_fn(|_| CitationValue::initial()),
            work: 0,
            labels: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Seed level labels, keyed by work number.
    pub fn with_labels(mut self, labels: BTreeMap<u16, LevelLabels>) -> Self {
        self.labels = labels;
        self
    }

    /// Current work number.
    pub fn work(&self) -> u16 {
        self.work
    }

    /// Current value of a level.
    pub fn level(&self, depth: usize) -> Option<&CitationValue> {
        self.levels.get(depth)
    }

    /// Labels of the current work, if seeded.
    pub fn labels(&self) -> Option<&LevelLabels> {
        self.labels.get(&self.work)
    }

    /// Label of a level in the current work.
    pub fn level_label(&self, depth: u8) -> Option<&str> {
        self.labels()?.get(&depth).map(String::as_str)
    }

    /// Anomalies recorded so far.
    pub fn diagnostics(&self) -> &[DecodeAnomaly] {
        &self.diagnostics
    }

    /// Take the recorded anomalies, leaving the list empty.
    pub fn take_diagnostics(&mut self) -> Vec<DecodeAnomaly> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Apply one token in document order.
    ///
    /// Returns the new snapshot if the token changed the hierarchy.
    pub fn apply(&mut self, token: CitationToken) -> Option<CitationSnapshot> {
        match token {
            CitationToken::SetLevel { level, value } => {
                let slot = self.slot(level)?;
                self.levels[slot] = value;
                self.reset_below(slot);
            }
            CitationToken::IncrementLevel { level } => {
                let slot = self.slot(level)?;
                match self.levels[slot].incremented() {
                    Ok(next) => self.levels[slot] = next,
                    Err(_) => self.diagnostics.push(DecodeAnomaly::UnsupportedIncrement {
                        level,
                        value: self.levels[slot].clone(),
                    }),
                }
                self.reset_below(slot);
            }
            CitationToken::AppendToLevel { level, suffix } => {
                let slot = self.slot(level)?;
                self.levels[slot] = self.levels[slot].appended(suffix);
                self.reset_below(slot);
            }
            CitationToken::NewWork => {
                self.work = self.work.saturating_add(1);
                self.reset_below(HIERARCHY_DEPTH);
            }
            CitationToken::Diagnostic(anomaly) => {
                self.diagnostics.push(anomaly);
                return None;
            }
            CitationToken::Metadata(_) | CitationToken::EndOfBlock | CitationToken::EndOfFile => {
                return None;
            }
        }
        Some(self.capture())
    }

    /// Capture the state for a literal text line. Does not mutate state.
    pub fn capture_line(&self, _text: &str) -> CitationSnapshot {
        self.capture()
    }

    /// Capture the current state.
    pub fn capture(&self) -> CitationSnapshot {
        CitationSnapshot {
            work: self.work,
            levels: self.levels.clone(),
        }
    }

    fn slot(&mut self, level: u8) -> Option<usize> {
        let slot = level as usize;
        if slot < HIERARCHY_DEPTH {
            return Some(slot);
        }
        self.diagnostics
            .push(DecodeAnomaly::LevelOutOfRange { level });
        None
    }

    fn reset_below(&mut self, slot: usize) {
        for value in &mut self.levels[..slot] {
            *value = CitationValue::initial();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{MetadataField, MetadataKey};

    fn set(level: u8, value: impl Into<CitationValue>) -> CitationToken {
        CitationToken::SetLevel {
            level,
            value: value.into(),
        }
    }

    fn numbers(snapshot: &CitationSnapshot) -> Vec<String> {
        snapshot.levels.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_initial_state() {
        let machine = HierarchyStateMachine::new();
        let snapshot = machine.capture();
        assert_eq!(snapshot.work, 0);
        assert!(snapshot.levels.iter().all(CitationValue::is_initial));
    }

    #[test]
    fn test_set_then_increment() {
        let mut machine = HierarchyStateMachine::new();
        machine.apply(set(0, 1u32));
        let snapshot = machine
            .apply(CitationToken::IncrementLevel { level: 1 })
            .unwrap();
        assert_eq!(numbers(&snapshot), ["1", "2", "1", "1", "1", "1"]);
    }

    #[test]
    fn test_reset_cascade_every_level() {
        for level in 0u8..6 {
            let mut machine = HierarchyStateMachine::new();
            for depth in 0u8..6 {
                machine.apply(set(depth, 9u32));
            }
            // Re-dirty every level, top down
            for depth in (0u8..6).rev() {
                machine.apply(set(depth, "x"));
            }

            let after_set = machine.apply(set(level, 5u32)).unwrap();
            let after_increment = {
                for depth in 0..level {
                    machine.apply(set(depth, 7u32));
                }
                machine
                    .apply(CitationToken::IncrementLevel { level })
                    .unwrap()
            };

            for depth in 0..level as usize {
                assert!(after_set.levels[depth].is_initial());
                assert!(after_increment.levels[depth].is_initial());
            }
            assert_eq!(after_set.levels[level as usize], CitationValue::Number(5));
            assert_eq!(after_increment.levels[level as usize], CitationValue::Number(6));
        }
    }

    #[test]
    fn test_levels_above_are_kept() {
        let mut machine = HierarchyStateMachine::new();
        machine.apply(set(3, 4u32));
        let snapshot = machine.apply(set(1, 2u32)).unwrap();
        assert_eq!(snapshot.levels[3], CitationValue::Number(4));
    }

    #[test]
    fn test_numeric_and_text_switch() {
        let mut machine = HierarchyStateMachine::new();
        machine.apply(set(1, 3u32));
        assert_eq!(machine.level(1), Some(&CitationValue::Number(3)));
        machine.apply(set(1, "b"));
        assert_eq!(machine.level(1), Some(&CitationValue::from("b")));
        machine.apply(CitationToken::IncrementLevel { level: 1 });
        assert_eq!(machine.level(1), Some(&CitationValue::from("c")));
        machine.apply(set(1, 10u32));
        assert_eq!(machine.level(1), Some(&CitationValue::Number(10)));
    }

    #[test]
    fn test_increment_past_z() {
        let mut machine = HierarchyStateMachine::new();
        machine.apply(set(2, "z"));
        machine.apply(set(0, 5u32));
        let snapshot = machine
            .apply(CitationToken::IncrementLevel { level: 2 })
            .unwrap();
        assert_eq!(snapshot.levels[2], CitationValue::from("z"));
        assert!(snapshot.levels[0].is_initial());
        assert_eq!(
            machine.diagnostics(),
            [DecodeAnomaly::UnsupportedIncrement {
                level: 2,
                value: CitationValue::from("z")
            }]
        );
    }

    #[test]
    fn test_increment_past_u32_max() {
        let mut machine = HierarchyStateMachine::new();
        machine.apply(set(0, u32::MAX));
        let snapshot = machine
            .apply(CitationToken::IncrementLevel { level: 0 })
            .unwrap();
        assert_eq!(snapshot.levels[0], CitationValue::Number(u32::MAX));
        assert_eq!(
            machine.diagnostics(),
            [DecodeAnomaly::UnsupportedIncrement {
                level: 0,
                value: CitationValue::Number(u32::MAX)
            }]
        );
    }

    #[test]
    fn test_append() {
        let mut machine = HierarchyStateMachine::new();
        machine.apply(set(0, 12u32));
        let snapshot = machine
            .apply(CitationToken::AppendToLevel { level: 0, suffix: 'a' })
            .unwrap();
        assert_eq!(snapshot.levels[0], CitationValue::from("12a"));
    }

    #[test]
    fn test_new_work_resets_everything() {
        let mut machine = HierarchyStateMachine::new();
        for depth in 0u8..6 {
            machine.apply(set(depth, 4u32));
        }
        let snapshot = machine.apply(CitationToken::NewWork).unwrap();
        assert_eq!(snapshot.work, 1);
        assert!(snapshot.levels.iter().all(CitationValue::is_initial));
    }

    #[test]
    fn test_capture_line_is_idempotent() {
        let mut machine = HierarchyStateMachine::new();
        machine.apply(set(1, "b"));
        let first = machine.capture_line("abc");
        let second = machine.capture_line("abc");
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_hierarchy_tokens() {
        let mut machine = HierarchyStateMachine::new();
        let field = MetadataField::new(MetadataKey::Date, "c. 200 BC");
        assert_eq!(machine.apply(CitationToken::Metadata(field)), None);
        assert_eq!(machine.apply(CitationToken::EndOfBlock), None);
        assert_eq!(
            machine.apply(CitationToken::Diagnostic(DecodeAnomaly::StrayTerminator {
                offset: 9
            })),
            None
        );
        assert_eq!(machine.take_diagnostics().len(), 1);
        assert!(machine.diagnostics().is_empty());
    }

    #[test]
    fn test_out_of_range_level() {
        let mut machine = HierarchyStateMachine::new();
        assert_eq!(machine.apply(set(6, 1u32)), None);
        assert_eq!(
            machine.apply(CitationToken::IncrementLevel { level: 9 }),
            None
        );
        assert_eq!(
            machine.diagnostics(),
            [
                DecodeAnomaly::LevelOutOfRange { level: 6 },
                DecodeAnomaly::LevelOutOfRange { level: 9 }
            ]
        );
        assert!(machine.capture().levels.iter().all(CitationValue::is_initial));
    }

    #[test]
    fn test_labels_follow_work() {
        let mut labels = BTreeMap::new();
        labels.insert(1, LevelLabels::from([(0, "line".to_string()), (1, "book".to_string())]));
        let mut machine = HierarchyStateMachine::new().with_labels(labels);
        assert_eq!(machine.level_label(0), None);
        machine.apply(CitationToken::NewWork);
        assert_eq!(machine.level_label(0), Some("line"));
        assert_eq!(machine.level_label(1), Some("book"));
        assert_eq!(machine.level_label(2), None);
    }

    #[test]
    fn test_citation_rendering() {
        let mut machine = HierarchyStateMachine::new();
        machine.apply(set(1, 2u32));
        machine.apply(set(0, 14u32));
        let snapshot = machine.capture();
        assert_eq!(snapshot.citation(2), "2.14");
        assert_eq!(snapshot.citation(1), "14");
        assert_eq!(snapshot.citation(0), "14");
        assert_eq!(snapshot.citation(6), "1.1.1.1.2.14");
    }
}
