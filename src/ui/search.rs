use std::collections::VecDeque;

use regex::{Regex, RegexBuilder};

use super::{EntryId, EntryTree};

/// A search request as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    /// Interpret `text` as a regular expression instead of a literal.
    pub regex: bool,
    pub case_sensitive: bool,
    /// Hide non-matching entries from layout.
    pub filter: bool,
}

impl SearchQuery {
    pub fn literal(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn regex(text: &str) -> Self {
        Self {
            text: text.to_string(),
            regex: true,
            ..Self::default()
        }
    }
}

/// A compiled query. Invalid or empty queries compile to `Never`, which
/// keeps the engine operative with zero matches.
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    Never,
    Regex(Regex),
}

impl CompiledPattern {
    pub fn compile(query: &SearchQuery) -> Self {
        if query.text.is_empty() {
            return CompiledPattern::Never;
        }
        let source = if query.regex {
            query.text.clone()
        } else {
            regex::escape(&query.text)
        };
        match RegexBuilder::new(&source)
            .case_insensitive(!query.case_sensitive)
            .build()
        {
            Ok(re) => CompiledPattern::Regex(re),
            Err(e) => {
                log::warn!("invalid search pattern {:?}: {}", query.text, e);
                CompiledPattern::Never
            }
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            CompiledPattern::Never => false,
            CompiledPattern::Regex(re) => re.is_match(text),
        }
    }
}

/// `(current match, total matches)` as reported to the search bar.
/// `current` is `None` when nothing is focused, including the off-the-end
/// state between wrapping presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub current: Option<usize>,
    pub total: usize,
}

/// Most-recent-first query history, kept separately for literal and regex
/// queries.
#[derive(Debug, Clone)]
pub struct SearchHistory {
    plain: VecDeque<String>,
    regex: VecDeque<String>,
    capacity: usize,
}

impl SearchHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            plain: VecDeque::new(),
            regex: VecDeque::new(),
            capacity,
        }
    }

    /// Move `text` to the front, dropping duplicates and the oldest entries
    /// past capacity.
    pub fn commit(&mut self, text: &str, regex: bool) {
        if text.is_empty() {
            return;
        }
        let list = if regex {
            &mut self.regex
        } else {
            &mut self.plain
        };
        if list.front().is_some_and(|t| t == text) {
            return;
        }
        list.retain(|t| t != text);
        list.push_front(text.to_string());
        list.truncate(self.capacity);
    }

    pub fn entries(&self, regex: bool) -> impl Iterator<Item = &str> {
        let list = if regex { &self.regex } else { &self.plain };
        list.iter().map(String::as_str)
    }
}

/// Match list and cursor for the active query.
pub(crate) struct SearchState {
    query: SearchQuery,
    pattern: CompiledPattern,
    matches: Vec<EntryId>,
    /// Last focused match; kept while `over_match` hides it.
    cursor: Option<usize>,
    /// Stepped past either end once; the next step in the same direction wraps.
    over_match: bool,
    /// Tree revision the matches were computed against.
    revision: u64,
    pub history: SearchHistory,
}

impl SearchState {
    pub fn new(history_size: usize) -> Self {
        Self {
            query: SearchQuery::default(),
            pattern: CompiledPattern::Never,
            matches: Vec::new(),
            cursor: None,
            over_match: false,
            revision: 0,
            history: SearchHistory::new(history_size),
        }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn matches(&self) -> &[EntryId] {
        &self.matches
    }

    pub fn is_match(&self, id: EntryId) -> bool {
        self.matches.contains(&id)
    }

    pub fn is_active(&self) -> bool {
        !self.query.text.is_empty()
    }

    pub fn current(&self) -> Option<usize> {
        if self.over_match { None } else { self.cursor }
    }

    pub fn focused_match(&self) -> Option<EntryId> {
        self.current().and_then(|i| self.matches.get(i).copied())
    }

    pub fn result(&self) -> SearchResult {
        SearchResult {
            current: self.current(),
            total: self.matches.len(),
        }
    }

    /// Tree changed since the matches were computed.
    pub fn is_stale(&self, tree: &EntryTree) -> bool {
        self.is_active() && self.revision != tree.revision()
    }

    /// Compile `query` and recompute matches. The focused match is kept if
    /// it still matches, otherwise the first match is focused.
    pub fn set_query(&mut self, tree: &mut EntryTree, query: SearchQuery) -> SearchResult {
        if query != self.query {
            log::debug!("search query {:?}", query);
            self.pattern = CompiledPattern::compile(&query);
            self.query = query;
        }
        self.refresh(tree)
    }

    /// Recompute matches against the current tree shape.
    pub fn refresh(&mut self, tree: &mut EntryTree) -> SearchResult {
        let previous = self.focused_match();
        // Entries under a hidden group can never be revealed, so they never match.
        self.matches = tree
            .walk_shown()
            .into_iter()
            .filter(|&(id, _)| {
                tree.entry(id)
                    .and_then(|e| e.search_text())
                    .is_some_and(|t| self.pattern.is_match(t))
            })
            .map(|(id, _)| id)
            .collect();
        self.over_match = false;
        self.cursor = match previous.and_then(|p| self.matches.iter().position(|&m| m == p)) {
            Some(i) => Some(i),
            None if self.matches.is_empty() => None,
            None => Some(0),
        };
        self.apply_filter(tree);
        self.revision = tree.revision();
        self.result()
    }

    /// Step to the next or previous match. Stepping past either end first
    /// parks on an off-the-end state with nothing focused; the following
    /// step in the same direction wraps around.
    pub fn next_match(&mut self, forward: bool) -> SearchResult {
        let total = self.matches.len();
        if total == 0 {
            self.cursor = None;
            self.over_match = false;
            return self.result();
        }
        let next = match self.cursor {
            Some(c) if forward => c as isize + 1,
            Some(c) => c as isize - 1,
            None if forward => 0,
            None => total as isize - 1,
        };
        if next < 0 || next >= total as isize {
            if self.over_match {
                self.over_match = false;
                self.cursor = Some(if forward { 0 } else { total - 1 });
            } else {
                self.over_match = true;
            }
        } else {
            self.over_match = false;
            self.cursor = Some(next as usize);
        }
        self.result()
    }

    pub fn commit_history(&mut self) {
        let (text, regex) = (self.query.text.clone(), self.query.regex);
        self.history.commit(&text, regex);
    }

    /// Clear the query, matches, and any filtering.
    pub fn dismiss(&mut self, tree: &mut EntryTree) {
        self.query = SearchQuery::default();
        self.pattern = CompiledPattern::Never;
        self.matches.clear();
        self.cursor = None;
        self.over_match = false;
        self.apply_filter(tree);
    }

    /// In filter mode an entry stays visible if it matches, or an ancestor
    /// or descendant matches.
    fn apply_filter(&self, tree: &mut EntryTree) {
        let filtering = self.query.filter && self.is_active();
        let all = tree.walk_all();
        if !filtering {
            let mut changed = false;
            for (id, _) in all {
                changed |= tree.set_filtered(id, false);
            }
            if changed {
                tree.refresh_all_heights();
            }
            return;
        }
        let mut keep: Vec<EntryId> = Vec::new();
        for &m in &self.matches {
            keep.push(m);
            keep.extend(tree.ancestors(m));
        }
        let mut changed = 0usize;
        for (id, _) in all {
            let visible = keep.contains(&id)
                || tree.ancestors(id).iter().any(|a| self.matches.contains(a));
            if tree.set_filtered(id, !visible) {
                changed += 1;
            }
        }
        if changed > 0 {
            log::debug!("search filter changed visibility of {} entries", changed);
            tree.refresh_all_heights();
        }
    }
}
