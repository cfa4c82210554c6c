//! Identity-based deduplication of message sequences.

use std::{collections::HashSet, hash::Hash};

use crate::models::Message;

/// A record with a stable identity.
pub trait Identified {
    type Id: Eq + Hash + ?Sized;

    fn identity(&self) -> &Self::Id;
}

impl Identified for Message {
    type Id = str;

    fn identity(&self) -> &str {
        &self.id
    }
}

/// Remove repeated identities, keeping the occurrence nearest the end.
///
/// The scan runs from the back so the latest copy of a record wins, while
/// survivors keep their original relative order. The input is not modified.
#[must_use]
pub fn unique_by_identity<T>(items: &[T]) -> Vec<T>
where
    T: Identified + Clone,
{
    let mut seen: HashSet<&T::Id> = HashSet::with_capacity(items.len());
    let mut kept: Vec<&T> = Vec::with_capacity(items.len());

    for item in items.iter().rev() {
        if seen.insert(item.identity()) {
            kept.push(item);
        }
    }

    kept.into_iter().rev().cloned().collect()
}

/// [`unique_by_identity`] specialised to messages.
#[must_use]
pub fn unique_messages(messages: &[Message]) -> Vec<Message> {
    unique_by_identity(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Record {
        id: u32,
        value: &'static str,
    }

    impl Identified for Record {
        type Id = u32;

        fn identity(&self) -> &u32 {
            &self.id
        }
    }

    fn rec(id: u32, value: &'static str) -> Record {
        Record { id, value }
    }

    #[test]
    fn test_last_occurrence_wins() {
        let input = vec![rec(1, "a"), rec(2, ""), rec(1, "b")];

        let output = unique_by_identity(&input);

        assert_eq!(output, vec![rec(2, ""), rec(1, "b")]);
    }

    #[test]
    fn test_input_is_left_untouched() {
        let input = vec![rec(1, "a"), rec(1, "b"), rec(1, "c")];
        let snapshot = input.clone();

        let output = unique_by_identity(&input);

        assert_eq!(input, snapshot);
        assert_eq!(output, vec![rec(1, "c")]);
    }

    #[test]
    fn test_empty_input() {
        let input: Vec<Record> = Vec::new();
        assert!(unique_by_identity(&input).is_empty());
    }

    #[test]
    fn test_no_duplicates_is_identity() {
        let input = vec![rec(3, "x"), rec(1, "y"), rec(2, "z")];
        assert_eq!(unique_by_identity(&input), input);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            rec(1, "a"),
            rec(2, "b"),
            rec(3, "c"),
            rec(2, "d"),
            rec(1, "e"),
            rec(4, "f"),
        ];

        let once = unique_by_identity(&input);
        let twice = unique_by_identity(&once);

        assert_eq!(once, twice);
        assert_eq!(once, vec![rec(3, "c"), rec(2, "d"), rec(1, "e"), rec(4, "f")]);
    }

    #[test]
    fn test_output_never_repeats_an_identity() {
        let input: Vec<Record> = (0..200).map(|n| rec(n % 17, "v")).collect();

        let output = unique_by_identity(&input);
        let ids: HashSet<u32> = output.iter().map(|record| record.id).collect();

        assert_eq!(ids.len(), output.len());
        assert_eq!(output.len(), 17);
    }
}
