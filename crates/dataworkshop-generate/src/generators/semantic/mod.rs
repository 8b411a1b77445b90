//! Pool synthesis for the named semantic types.

use rand::RngCore;

use crate::faker_rs::{FakeRsAdapter, FakerKind, LocaleKey};

/// Draw `count` values from the faker provider.
///
/// Values are not deduplicated: `count` is a draw budget, so the pool may
/// hold fewer unique entries than its length.
pub fn faker_pool(
    kind: FakerKind,
    locale: LocaleKey,
    count: usize,
    rng: &mut dyn RngCore,
) -> Vec<String> {
    (0..count)
        .map(|_| FakeRsAdapter::generate_value(kind, locale, rng))
        .collect()
}

/// `<name>1 ..= <name>count`, in order.
pub fn named_sequence_pool(name: &str, count: usize) -> Vec<String> {
    (1..=count).map(|idx| format!("{name}{idx}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_sequence_appends_one_based_index() {
        assert_eq!(
            named_sequence_pool("Column 1", 3),
            vec!["Column 11", "Column 12", "Column 13"]
        );
    }
}
