//! Predicate compiler for the faceted video search.
//!
//! A [`SearchFilter`] compiles into a [`CompiledPredicate`]: an ordered list
//! of typed clauses, independent of any SQL text. Rendering produces a single
//! `WHERE` fragment with positional `$n` placeholders plus the matching
//! ordered parameter list, so the row query, the count query, and every facet
//! query share identical filtering semantics by embedding the same fragment.
//!
//! Combination semantics: clauses AND together; values within one dimension
//! OR together. A filter with no active dimensions compiles to an empty
//! predicate that selects the entire `video_search_mv` population.

use crate::search::SearchFilter;

/// One independent filter clause against the `video_search_mv` aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Case-insensitive substring match over title, description, and
    /// channel title.
    Text(String),
    /// Channel title equals any of the given values.
    ChannelIn(Vec<String>),
    /// The video's brand set intersects the given values.
    BrandsIntersect(Vec<String>),
    /// The video's model set intersects the given values.
    ModelsIntersect(Vec<String>),
    /// The video's tag value for `key` equals any of `values`. A video
    /// without the key never matches.
    TagMatch { key: String, values: Vec<String> },
}

/// A positional query parameter produced by rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    TextArray(Vec<String>),
}

/// The rendered `WHERE` fragment and its ordered parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPredicate {
    /// Either empty or `"WHERE <clause> AND <clause> ..."`.
    pub where_sql: String,
    /// Parameters in placeholder order, starting at the index given to
    /// [`CompiledPredicate::render`].
    pub params: Vec<SqlParam>,
    /// Index of the first placeholder after the predicate's own parameters.
    ///
    /// Callers append their own placeholders (LIMIT/OFFSET) from here.
    pub next_index: usize,
}

/// An ordered set of filter clauses compiled from a [`SearchFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledPredicate {
    clauses: Vec<Clause>,
}

impl CompiledPredicate {
    /// Compile the active dimensions of a filter into clauses.
    ///
    /// Inactive (empty) dimensions contribute no clause. Clause order is
    /// fixed (text, channels, brands, models, tags by key) so identical
    /// filters always render identically.
    pub fn compile(filter: &SearchFilter) -> Self {
        let mut clauses = Vec::new();

        if let Some(search) = &filter.search {
            clauses.push(Clause::Text(search.clone()));
        }
        if !filter.channels.is_empty() {
            clauses.push(Clause::ChannelIn(filter.channels.clone()));
        }
        if !filter.brands.is_empty() {
            clauses.push(Clause::BrandsIntersect(filter.brands.clone()));
        }
        if !filter.models.is_empty() {
            clauses.push(Clause::ModelsIntersect(filter.models.clone()));
        }
        for (key, values) in &filter.tags {
            clauses.push(Clause::TagMatch {
                key: key.clone(),
                values: values.clone(),
            });
        }

        Self { clauses }
    }

    /// Whether the predicate imposes no constraint.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Render the predicate to a `WHERE` fragment with placeholders starting
    /// at `$first_index`.
    ///
    /// An empty predicate renders to an empty string, which embeds cleanly
    /// into `SELECT ... FROM video_search_mv {where_sql} ...`.
    pub fn render(&self, first_index: usize) -> RenderedPredicate {
        let mut params = Vec::new();
        let mut index = first_index;
        let mut fragments = Vec::with_capacity(self.clauses.len());

        for clause in &self.clauses {
            match clause {
                Clause::Text(needle) => {
                    let pattern = format!("%{needle}%");
                    fragments.push(format!(
                        "(title ILIKE ${} OR description ILIKE ${} OR channel_title ILIKE ${})",
                        index,
                        index + 1,
                        index + 2
                    ));
                    params.push(SqlParam::Text(pattern.clone()));
                    params.push(SqlParam::Text(pattern.clone()));
                    params.push(SqlParam::Text(pattern));
                    index += 3;
                }
                Clause::ChannelIn(values) => {
                    fragments.push(format!("channel_title = ANY(${index})"));
                    params.push(SqlParam::TextArray(values.clone()));
                    index += 1;
                }
                Clause::BrandsIntersect(values) => {
                    fragments.push(format!("brands && ${index}::text[]"));
                    params.push(SqlParam::TextArray(values.clone()));
                    index += 1;
                }
                Clause::ModelsIntersect(values) => {
                    fragments.push(format!("models && ${index}::text[]"));
                    params.push(SqlParam::TextArray(values.clone()));
                    index += 1;
                }
                Clause::TagMatch { key, values } => {
                    fragments.push(format!("tags->>${} = ANY(${}::text[])", index, index + 1));
                    params.push(SqlParam::Text(key.clone()));
                    params.push(SqlParam::TextArray(values.clone()));
                    index += 2;
                }
            }
        }

        let where_sql = if fragments.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", fragments.join(" AND "))
        };

        RenderedPredicate {
            where_sql,
            params,
            next_index: index,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
