//! Autocomplete attached to the search input.

use swiss_core::complete::{CompleteOptions, SearchResult, UserComplete};

use crate::common::TaskSeq;
use crate::effects::UiEffect;

/// Suggestion state for an attached completion handle.
#[derive(Debug)]
pub struct Autocomplete {
    handle: UserComplete,
    opts: CompleteOptions,
    /// Term of the latest query; older results are ignored.
    term: String,
    suggestions: Vec<SearchResult>,
    selected: usize,
    loading: bool,
}

impl Autocomplete {
    pub fn attach(handle: UserComplete, opts: CompleteOptions) -> Self {
        Self {
            handle,
            opts,
            term: String::new(),
            suggestions: Vec::new(),
            selected: 0,
            loading: false,
        }
    }

    pub fn options(&self) -> &CompleteOptions {
        &self.opts
    }

    pub fn suggestions(&self) -> &[SearchResult] {
        &self.suggestions
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&SearchResult> {
        self.suggestions.get(self.selected)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Reacts to an edited term. Short terms clear the list; others issue a query.
    pub fn on_term_changed(&mut self, term: &str, seq: &mut TaskSeq) -> Option<UiEffect> {
        let term = term.trim();
        if term == self.term {
            return None;
        }
        self.term = term.to_string();

        if !self.opts.accepts(term) {
            self.clear();
            return None;
        }

        self.loading = true;
        Some(UiEffect::SearchPlayers {
            task: seq.next_id(),
            handle: self.handle.clone(),
            opts: self.opts.clone(),
            term: self.term.clone(),
        })
    }

    /// Applies query results for `term` if it is still the current term.
    pub fn on_results(&mut self, term: &str, result: Result<Vec<SearchResult>, String>) {
        if term != self.term {
            tracing::debug!(term, current = %self.term, "ignoring stale suggestions");
            return;
        }
        self.loading = false;
        match result {
            Ok(mut results) => {
                results.truncate(self.opts.max_results);
                self.suggestions = results;
                self.selected = 0;
            }
            Err(error) => {
                tracing::warn!(term, %error, "player search failed");
                self.suggestions.clear();
                self.selected = 0;
            }
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.suggestions.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Drops suggestions and forgets the current term.
    pub fn reset(&mut self) {
        self.term.clear();
        self.clear();
    }

    fn clear(&mut self) {
        self.suggestions.clear();
        self.selected = 0;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures_util::FutureExt;
    use futures_util::future::BoxFuture;
    use swiss_core::complete::CompletionSource;
    use swiss_core::tournament::{PlayerId, SwissId};

    use super::*;

    struct NoSource;

    impl CompletionSource for NoSource {
        fn search(
            &self,
            _opts: &CompleteOptions,
            _term: &str,
        ) -> BoxFuture<'static, anyhow::Result<Vec<SearchResult>>> {
            futures_util::future::ready(Ok(Vec::new())).boxed()
        }
    }

    fn result(id: &str) -> SearchResult {
        SearchResult {
            id: PlayerId::new(id),
            name: id.to_string(),
            title: None,
            rating: None,
            match_indices: Vec::new(),
        }
    }

    fn autocomplete() -> Autocomplete {
        let opts = CompleteOptions::new(SwissId("abc".to_string()));
        Autocomplete::attach(UserComplete::new(Arc::new(NoSource)), opts)
    }

    #[test]
    fn test_short_term_does_not_query() {
        let mut ac = autocomplete();
        let mut seq = TaskSeq::default();
        assert!(ac.on_term_changed("us", &mut seq).is_none());
        assert!(!ac.is_loading());
    }

    #[test]
    fn test_term_change_queries_once() {
        let mut ac = autocomplete();
        let mut seq = TaskSeq::default();

        let effect = ac.on_term_changed("user", &mut seq);
        assert!(matches!(
            effect,
            Some(UiEffect::SearchPlayers { ref term, ref opts, .. })
                if term == "user" && opts.swiss.0 == "abc"
        ));
        assert!(ac.is_loading());

        // Same term (modulo whitespace) does not re-query.
        assert!(ac.on_term_changed("user ", &mut seq).is_none());
    }

    #[test]
    fn test_stale_results_are_ignored() {
        let mut ac = autocomplete();
        let mut seq = TaskSeq::default();
        ac.on_term_changed("user", &mut seq);
        ac.on_term_changed("user4", &mut seq);

        ac.on_results("user", Ok(vec![result("user1")]));
        assert!(ac.suggestions().is_empty());
        assert!(ac.is_loading());

        ac.on_results("user4", Ok(vec![result("user4"), result("user42")]));
        assert_eq!(ac.suggestions().len(), 2);
        assert!(!ac.is_loading());
    }

    #[test]
    fn test_selection_is_bounded() {
        let mut ac = autocomplete();
        let mut seq = TaskSeq::default();
        ac.on_term_changed("user", &mut seq);
        ac.on_results("user", Ok(vec![result("user1"), result("user2")]));

        ac.select_prev();
        assert_eq!(ac.selected_index(), 0);
        ac.select_next();
        ac.select_next();
        assert_eq!(ac.selected().map(|r| r.id.as_str()), Some("user2"));
    }

    #[test]
    fn test_failed_query_clears_suggestions() {
        let mut ac = autocomplete();
        let mut seq = TaskSeq::default();
        ac.on_term_changed("user", &mut seq);
        ac.on_results("user", Err("backend down".to_string()));

        assert!(ac.suggestions().is_empty());
        assert!(!ac.is_loading());
    }
}
