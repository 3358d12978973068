//! LLVM-style name uniquing.

use rustc_hash::{FxHashMap, FxHashSet};

/// Hands out unique names within one namespace.
///
/// The first request for a hint gets the hint itself; later requests get
/// the hint with an increasing numeric suffix (`if.end`, `if.end1`, ...),
/// skipping any candidate that is already taken.
#[derive(Default)]
pub(super) struct NameTable {
    used: FxHashSet<String>,
    counters: FxHashMap<String, u32>,
}

impl NameTable {
    pub(super) fn unique(&mut self, hint: &str) -> String {
        let base = if hint.is_empty() { "tmp" } else { hint };
        if self.used.insert(base.to_owned()) {
            return base.to_owned();
        }
        let counter = self.counters.entry(base.to_owned()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{base}{counter}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NameTable;

    #[test]
    fn suffixes_repeated_hints() {
        let mut names = NameTable::default();
        assert_eq!(names.unique("if.end"), "if.end");
        assert_eq!(names.unique("if.end"), "if.end1");
        assert_eq!(names.unique("if.end"), "if.end2");
        assert_eq!(names.unique(""), "tmp");
        assert_eq!(names.unique(""), "tmp1");
    }

    #[test]
    fn skips_taken_candidates() {
        let mut names = NameTable::default();
        assert_eq!(names.unique("x1"), "x1");
        assert_eq!(names.unique("x"), "x");
        assert_eq!(names.unique("x"), "x2");
    }
}
