//! Find-exactly-one helper shared by the zone and record lookups

use crate::error::{Error, Result};

/// How many items matched a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// Nothing matched
    NotFound,
    /// Exactly one item matched
    Found(T),
    /// Several items matched; `first` is the earliest in list order
    Multiple { first: T, count: usize },
}

impl<T> Lookup<T> {
    /// Collapse to the first match, failing when there is none
    ///
    /// Extra matches are logged and dropped. `what` names the lookup in
    /// messages, e.g. "zone example.com".
    pub fn into_first(self, what: &str) -> Result<T> {
        match self {
            Lookup::Found(item) => Ok(item),
            Lookup::Multiple { first, count } => {
                tracing::warn!("{} matched {} entries, using the first", what, count);
                Ok(first)
            }
            Lookup::NotFound => Err(Error::not_found(what)),
        }
    }
}

/// Scan `items` in order and classify the ones accepted by `predicate`
pub fn find_exactly_one<T, I, P>(items: I, mut predicate: P) -> Lookup<T>
where
    I: IntoIterator<Item = T>,
    P: FnMut(&T) -> bool,
{
    let mut matches = items.into_iter().filter(|item| predicate(item));

    let Some(first) = matches.next() else {
        return Lookup::NotFound;
    };

    match matches.count() {
        0 => Lookup::Found(first),
        rest => Lookup::Multiple {
            first,
            count: rest + 1,
        },
    }
}
