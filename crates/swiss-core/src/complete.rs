//! Player completion service.
//!
//! The search input does not look the completion widget up globally: a
//! [`UserCompleteService`] is injected and asked, asynchronously, for a
//! [`UserComplete`] handle. The handle is then attached to the input with
//! [`CompleteOptions`] and queried per keystroke through its
//! [`CompletionSource`].

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config as MatcherConfig, Matcher, Utf32Str};

use crate::tournament::{Player, PlayerId, SwissId, TournamentData};

/// Suggestion tag used by the standings search.
pub const DEFAULT_TAG: &str = "span";

/// A player suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub id: PlayerId,
    pub name: String,
    pub title: Option<String>,
    pub rating: Option<u32>,
    /// Char positions in `name` matched by the query, ascending.
    pub match_indices: Vec<usize>,
}

impl From<&Player> for SearchResult {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            title: player.title.clone(),
            rating: Some(player.rating),
            match_indices: Vec::new(),
        }
    }
}

/// Options passed when attaching the completion handle to an input.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteOptions {
    /// Restricts suggestions to players of this tournament.
    pub swiss: SwissId,
    /// Tag applied to each matched suggestion.
    pub tag: String,
    /// Whether the input should take focus as soon as it is attached.
    pub focus: bool,
    pub min_length: usize,
    pub max_results: usize,
}

impl CompleteOptions {
    pub fn new(swiss: SwissId) -> Self {
        Self {
            swiss,
            tag: DEFAULT_TAG.to_string(),
            focus: true,
            min_length: 3,
            max_results: 8,
        }
    }

    /// Whether a term is long enough to be searched.
    pub fn accepts(&self, term: &str) -> bool {
        term.trim().chars().count() >= self.min_length
    }
}

/// Backend answering suggestion queries.
pub trait CompletionSource: Send + Sync {
    fn search(&self, opts: &CompleteOptions, term: &str)
    -> BoxFuture<'static, Result<Vec<SearchResult>>>;
}

/// Attachment handle returned by a [`UserCompleteService`].
#[derive(Clone)]
pub struct UserComplete {
    source: Arc<dyn CompletionSource>,
}

impl UserComplete {
    pub fn new(source: Arc<dyn CompletionSource>) -> Self {
        Self { source }
    }

    pub fn search(
        &self,
        opts: &CompleteOptions,
        term: &str,
    ) -> BoxFuture<'static, Result<Vec<SearchResult>>> {
        self.source.search(opts, term)
    }
}

impl fmt::Debug for UserComplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserComplete").finish_non_exhaustive()
    }
}

/// Provider of the completion handle.
///
/// Acquisition is asynchronous and happens once per input mount.
pub trait UserCompleteService: Send + Sync {
    fn user_complete(&self) -> BoxFuture<'static, Result<UserComplete>>;
}

impl fmt::Debug for dyn UserCompleteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserCompleteService")
    }
}

/// Completes against the roster of a loaded tournament.
pub struct LocalUserComplete {
    source: Arc<RosterSource>,
}

impl LocalUserComplete {
    pub fn new(data: &TournamentData) -> Self {
        Self {
            source: Arc::new(RosterSource {
                swiss: data.id.clone(),
                players: data.players.iter().map(SearchResult::from).collect(),
            }),
        }
    }
}

impl UserCompleteService for LocalUserComplete {
    fn user_complete(&self) -> BoxFuture<'static, Result<UserComplete>> {
        let source: Arc<dyn CompletionSource> = self.source.clone();
        futures_util::future::ready(Ok(UserComplete::new(source))).boxed()
    }
}

struct RosterSource {
    swiss: SwissId,
    players: Vec<SearchResult>,
}

impl RosterSource {
    fn matches(&self, opts: &CompleteOptions, term: &str) -> Vec<SearchResult> {
        if opts.swiss != self.swiss || !opts.accepts(term) {
            return Vec::new();
        }

        let mut matcher = Matcher::new(MatcherConfig::DEFAULT);
        let pattern = Pattern::parse(term.trim(), CaseMatching::Ignore, Normalization::Smart);
        let mut buf = Vec::new();

        let mut scored: Vec<(u32, SearchResult)> = self
            .players
            .iter()
            .filter_map(|player| {
                let haystack = Utf32Str::new(&player.name, &mut buf);
                let score = pattern.score(haystack, &mut matcher)?;

                let mut indices = Vec::new();
                pattern.indices(haystack, &mut matcher, &mut indices);
                indices.sort_unstable();
                indices.dedup();

                let mut result = player.clone();
                result.match_indices = indices.into_iter().map(|idx| idx as usize).collect();
                Some((score, result))
            })
            .collect();

        // Stable: equal scores keep standings order.
        scored.sort_by_key(|(score, _)| std::cmp::Reverse(*score));
        scored
            .into_iter()
            .take(opts.max_results)
            .map(|(_, result)| result)
            .collect()
    }
}

impl CompletionSource for RosterSource {
    fn search(
        &self,
        opts: &CompleteOptions,
        term: &str,
    ) -> BoxFuture<'static, Result<Vec<SearchResult>>> {
        let results = self.matches(opts, term);
        tracing::debug!(swiss = %opts.swiss, term, hits = results.len(), "roster search");
        futures_util::future::ready(Ok(results)).boxed()
    }
}
