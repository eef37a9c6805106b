//! Type-to-narrow filtering over a fixed list of candidates
//!
//! [`FilteredList`] keeps the candidates whose lowercase form contains the
//! lowercase filter, in original order, with exact (case-insensitive) matches
//! pulled to the front. [`SearchSession`] adds the hover/confirm navigation a
//! selection popup needs on top of it.

/// A visible entry, remembering its position in the full candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub index: usize,
    pub text: String,
}

/// Candidates narrowed by a filter string
#[derive(Debug, Clone)]
pub struct FilteredList {
    items: Vec<String>,
    lowered: Vec<String>,
    filter: String,
    entries: Vec<Entry>,
}

impl FilteredList {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        let lowered = items.iter().map(|s| s.to_lowercase()).collect();
        let mut list = Self {
            items,
            lowered,
            filter: String::new(),
            entries: Vec::new(),
        };
        list.recompute();
        list
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Texts of the visible entries
    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.text.as_str()).collect()
    }

    /// Total number of candidates, ignoring the filter
    pub fn max_len(&self) -> usize {
        self.items.len()
    }

    /// Apply a new filter; returns false without recomputing when unchanged
    pub fn update_filter(&mut self, filter: &str) -> bool {
        if self.filter == filter {
            return false;
        }
        self.filter = filter.to_string();
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        let needle = self.filter.to_lowercase();
        let mut exact = Vec::new();
        let mut partial = Vec::new();

        for (index, (text, lowered)) in self.items.iter().zip(&self.lowered).enumerate() {
            if !lowered.contains(needle.as_str()) {
                continue;
            }
            let entry = Entry {
                index,
                text: text.clone(),
            };
            if *lowered == needle {
                exact.push(entry);
            } else {
                partial.push(entry);
            }
        }

        exact.append(&mut partial);
        self.entries = exact;
    }
}

/// Keyboard-style navigation over a [`FilteredList`]
#[derive(Debug, Clone)]
pub struct SearchSession {
    list: FilteredList,
    current: Option<usize>,
    hover: usize,
}

impl SearchSession {
    /// Start a session with `current` as the pre-selected candidate index
    pub fn new<I, S>(items: I, current: Option<usize>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = FilteredList::new(items);
        let hover = current
            .and_then(|c| list.entries().iter().position(|e| e.index == c))
            .unwrap_or(0);
        Self {
            list,
            current,
            hover,
        }
    }

    pub fn list(&self) -> &FilteredList {
        &self.list
    }

    /// Candidate index selected when the session opened
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Position of the hovered entry within the visible entries
    pub fn hover(&self) -> usize {
        self.hover
    }

    pub fn hovered(&self) -> Option<&Entry> {
        self.list.entries().get(self.hover)
    }

    /// Narrow the list; hover returns to the top when the filter changed
    pub fn set_filter(&mut self, filter: &str) -> bool {
        let changed = self.list.update_filter(filter);
        if changed {
            self.hover = 0;
        }
        changed
    }

    pub fn clear_filter(&mut self) -> bool {
        self.set_filter("")
    }

    pub fn move_down(&mut self) {
        let last = self.list.entries().len().saturating_sub(1);
        self.hover = (self.hover + 1).min(last);
    }

    pub fn move_up(&mut self) {
        self.hover = self.hover.saturating_sub(1);
    }

    /// Hover the entry at `position`, ignoring positions past the end
    pub fn hover_at(&mut self, position: usize) {
        if position < self.list.entries().len() {
            self.hover = position;
        }
    }

    /// Candidate index of the hovered entry, if any is visible
    pub fn confirm(&self) -> Option<usize> {
        self.hovered().map(|e| e.index)
    }
}
