use crate::cohort::CohortEntry;

pub const DEFAULT_SELECTION_SIZE: usize = 2;

/// Ordered, duplicate-free set of selected player names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    names: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = Self::new();
        for name in names {
            out.insert(name.into());
        }
        out
    }

    pub fn default_for(cohort: &[CohortEntry]) -> Self {
        Self::from_names(
            cohort
                .iter()
                .take(DEFAULT_SELECTION_SIZE)
                .map(|entry| entry.display_name.clone()),
        )
    }

    pub fn insert(&mut self, name: String) -> bool {
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Returns true when the name is selected after the call.
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(pos) = self.names.iter().position(|n| n == name) {
            self.names.remove(pos);
            false
        } else {
            self.names.push(name.to_string());
            true
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(rank: usize, name: &str) -> CohortEntry {
        CohortEntry {
            rank,
            display_name: name.to_string(),
            total: 0.0,
            seasons: 1,
        }
    }

    #[test]
    fn default_takes_two_highest_ranked() {
        let cohort = vec![entry(1, "B"), entry(2, "A"), entry(3, "C")];
        let sel = Selection::default_for(&cohort);
        assert_eq!(sel.names(), ["B".to_string(), "A".to_string()]);
        assert!(Selection::default_for(&[]).is_empty());
    }

    #[test]
    fn toggle_appends_and_removes_keeping_order() {
        let mut sel = Selection::from_names(["A", "B", "A"]);
        assert_eq!(sel.len(), 2);
        assert!(!sel.toggle("A"));
        assert!(sel.toggle("C"));
        assert!(sel.toggle("A"));
        assert_eq!(sel.names(), ["B".to_string(), "C".to_string(), "A".to_string()]);
    }
}
