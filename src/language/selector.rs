use rand::seq::SliceRandom;

/// Trait for different word selection strategies
pub trait WordSelector {
    /// Select exactly `count` lowercase words from `pool`
    fn select_words(&self, pool: &[&str], count: usize) -> Vec<String>;
}

/// Random selection without replacement. When the pool is smaller than the
/// round, further shuffled passes over the pool are appended.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl WordSelector for RandomSelector {
    fn select_words(&self, pool: &[&str], count: usize) -> Vec<String> {
        if pool.is_empty() {
            return Vec::new();
        }

        let mut rng = rand::thread_rng();
        let mut words = Vec::with_capacity(count);
        while words.len() < count {
            let remaining = count - words.len();
            words.extend(
                pool.choose_multiple(&mut rng, remaining.min(pool.len()))
                    .map(|w| w.to_lowercase()),
            );
        }
        words
    }
}
