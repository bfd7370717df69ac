/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::fmt::Debug;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

/// Chooses words for a chatter message.
pub trait WordSampler: Send + Sync + Debug {
    /// Returns `amount` distinct entries of `vocabulary`.
    ///
    /// Callers guarantee `amount <= vocabulary.len()`.
    fn sample(&self, vocabulary: &[String], amount: usize) -> Vec<String>;
}

/// Samples with the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSampler;

impl WordSampler for RandomSampler {
    fn sample(&self, vocabulary: &[String], amount: usize) -> Vec<String> {
        pick(&mut rand::rng(), vocabulary, amount)
    }
}

/// Samples with a seeded generator, so a run can be reproduced.
#[derive(Debug)]
pub struct SeededSampler {
    rng: Mutex<StdRng>,
}

impl SeededSampler {
    /// Creates a sampler whose sequence is fixed by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl WordSampler for SeededSampler {
    fn sample(&self, vocabulary: &[String], amount: usize) -> Vec<String> {
        pick(&mut *self.rng.lock(), vocabulary, amount)
    }
}

// Without replacement, in random order.
fn pick<R: Rng + ?Sized>(rng: &mut R, vocabulary: &[String], amount: usize) -> Vec<String> {
    index::sample(rng, vocabulary.len(), amount)
        .into_iter()
        .map(|i| vocabulary[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::common::ChatterConfig;

    #[test]
    fn random_samples_are_distinct_vocabulary_words() {
        let vocabulary = ChatterConfig::default().vocabulary;
        for _ in 0..200 {
            let words = RandomSampler.sample(&vocabulary, 2);
            assert_eq!(words.len(), 2);
            assert_ne!(words[0], words[1]);
            assert!(words.iter().all(|w| vocabulary.contains(w)));
        }
    }

    #[test]
    fn full_sample_is_a_permutation() {
        let vocabulary = ChatterConfig::default().vocabulary;
        let words: HashSet<_> = RandomSampler.sample(&vocabulary, vocabulary.len()).into_iter().collect();
        assert_eq!(words.len(), vocabulary.len());
    }

    #[test]
    fn same_seed_same_sequence() {
        let vocabulary = ChatterConfig::default().vocabulary;
        let left = SeededSampler::new(7);
        let right = SeededSampler::new(7);
        for _ in 0..20 {
            assert_eq!(left.sample(&vocabulary, 2), right.sample(&vocabulary, 2));
        }
    }
}
