use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::ClassFile;

/// Covered/missed counts for one entity (instructions or branches) on one line,
/// or aggregated over many lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCounter {
    pub covered: u32,
    pub missed: u32,
}

impl LineCounter {
    #[must_use]
    pub const fn new(covered: u32, missed: u32) -> Self {
        Self { covered, missed }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.covered.saturating_add(self.missed)
    }

    /// Covered ratio; `1.0` when there is nothing to cover.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 1.0;
        }
        f64::from(self.covered) / f64::from(total)
    }

    /// Combine two observations of the same line from different runs.
    #[must_use]
    pub fn merge_observation(self, other: Self) -> Self {
        let covered = self.covered.max(other.covered);
        let total = self.total().max(other.total());
        Self {
            covered,
            missed: total.saturating_sub(covered),
        }
    }
}

impl std::ops::Add for LineCounter {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            covered: self.covered.saturating_add(rhs.covered),
            missed: self.missed.saturating_add(rhs.missed),
        }
    }
}

impl std::ops::AddAssign for LineCounter {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Line-level coverage of a single class.
///
/// `covered_lines` and `missed_lines` are disjoint. A line missing from both is
/// not executable. `instructions` and `branches` carry per-line counters when
/// the coverage tool reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageCounters {
    pub covered_lines: BTreeSet<u32>,
    pub missed_lines: BTreeSet<u32>,
    pub instructions: BTreeMap<u32, LineCounter>,
    pub branches: BTreeMap<u32, LineCounter>,
}

impl CoverageCounters {
    #[must_use]
    pub fn from_lines(
        covered: impl IntoIterator<Item = u32>,
        missed: impl IntoIterator<Item = u32>,
    ) -> Self {
        let mut counters = Self {
            covered_lines: covered.into_iter().collect(),
            missed_lines: missed.into_iter().collect(),
            ..Self::default()
        };
        counters.normalize();
        counters
    }

    #[must_use]
    pub fn with_instructions(
        mut self,
        instructions: impl IntoIterator<Item = (u32, LineCounter)>,
    ) -> Self {
        self.instructions.extend(instructions);
        self
    }

    #[must_use]
    pub fn with_branches(
        mut self,
        branches: impl IntoIterator<Item = (u32, LineCounter)>,
    ) -> Self {
        self.branches.extend(branches);
        self
    }

    /// A line reported as both covered and missed counts as covered.
    pub fn normalize(&mut self) {
        let covered = &self.covered_lines;
        self.missed_lines.retain(|line| !covered.contains(line));
    }

    /// Fold another run's counters for the same class into this one.
    pub fn merge(&mut self, other: &Self) {
        self.covered_lines.extend(other.covered_lines.iter().copied());
        self.missed_lines.extend(other.missed_lines.iter().copied());
        self.normalize();
        merge_counter_map(&mut self.instructions, &other.instructions);
        merge_counter_map(&mut self.branches, &other.branches);
    }

    /// Keep only the data on the given lines.
    #[must_use]
    pub fn restrict_to(&self, lines: &BTreeSet<u32>) -> Self {
        Self {
            covered_lines: self.covered_lines.intersection(lines).copied().collect(),
            missed_lines: self.missed_lines.intersection(lines).copied().collect(),
            instructions: restrict_counter_map(&self.instructions, lines),
            branches: restrict_counter_map(&self.branches, lines),
        }
    }

    /// True when no executable line, instruction or branch is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.covered_lines.is_empty()
            && self.missed_lines.is_empty()
            && self.instructions.values().all(|c| c.total() == 0)
            && self.branches.values().all(|c| c.total() == 0)
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn line_counter(&self) -> LineCounter {
        LineCounter::new(
            self.covered_lines.len() as u32,
            self.missed_lines.len() as u32,
        )
    }

    #[must_use]
    pub fn instruction_counter(&self) -> LineCounter {
        self.instructions
            .values()
            .fold(LineCounter::default(), |acc, c| acc + *c)
    }

    #[must_use]
    pub fn branch_counter(&self) -> LineCounter {
        self.branches
            .values()
            .fold(LineCounter::default(), |acc, c| acc + *c)
    }
}

fn merge_counter_map(
    target: &mut BTreeMap<u32, LineCounter>,
    source: &BTreeMap<u32, LineCounter>,
) {
    for (line, counter) in source {
        target
            .entry(*line)
            .and_modify(|existing| *existing = existing.merge_observation(*counter))
            .or_insert(*counter);
    }
}

fn restrict_counter_map(
    map: &BTreeMap<u32, LineCounter>,
    lines: &BTreeSet<u32>,
) -> BTreeMap<u32, LineCounter> {
    map.iter()
        .filter(|(line, _)| lines.contains(line))
        .map(|(line, counter)| (*line, *counter))
        .collect()
}

/// Coverage of one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCoverage {
    pub class: ClassFile,
    pub counters: CoverageCounters,
}

impl ClassCoverage {
    #[must_use]
    pub const fn new(class: ClassFile, counters: CoverageCounters) -> Self {
        Self { class, counters }
    }
}

/// All decoded coverage, keyed by class name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageData {
    classes: BTreeMap<String, ClassCoverage>,
}

impl CoverageData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class, merging with an existing entry of the same name.
    pub fn insert(&mut self, coverage: ClassCoverage) {
        let key = coverage.class.class_name().to_string();
        match self.classes.get_mut(&key) {
            Some(existing) => existing.counters.merge(&coverage.counters),
            None => {
                self.classes.insert(key, coverage);
            }
        }
    }

    pub fn merge(&mut self, other: Self) {
        for coverage in other.classes.into_values() {
            self.insert(coverage);
        }
    }

    #[must_use]
    pub fn get(&self, class_name: &str) -> Option<&ClassCoverage> {
        self.classes.get(class_name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassCoverage> {
        self.classes.values()
    }

    #[must_use]
    pub fn into_classes(self) -> Vec<ClassCoverage> {
        self.classes.into_values().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl FromIterator<ClassCoverage> for CoverageData {
    fn from_iter<T: IntoIterator<Item = ClassCoverage>>(iter: T) -> Self {
        let mut data = Self::new();
        for coverage in iter {
            data.insert(coverage);
        }
        data
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
