//! Sigma-scaled roulette-wheel selection.
//!
//! Selection works on plain fitness slices so it can be tested without
//! chromosomes. [`Population`](crate::population::Population) combines it
//! with elitism: slot 0 is always [`best_index`], the remaining slots are
//! filled by [`roulette`].

use rand::Rng;

/// Scales fitness values into roulette weights.
///
/// Each weight is `pressure * fitness / mean`, or `pressure * fitness` when
/// the mean is zero. Negative weights are clamped to zero.
///
/// The sign of a weight follows the sign of `fitness / mean`. With a positive
/// mean, negative fitness gets weight zero and is never picked by the wheel.
/// With a negative mean the division flips every sign: positive fitness is
/// clamped to zero and the most negative fitness gets the largest weight.
/// Fitness functions are expected to stay non-negative, with `0` for
/// inviable organisms.
///
/// ```
/// use karva_training::selection::sigma_scaled_weights;
///
/// let weights = sigma_scaled_weights(&[1.0, 3.0], 2.0);
/// assert_eq!(weights, [1.0, 3.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn sigma_scaled_weights(fitnesses: &[f64], pressure: f64) -> Vec<f64> {
    if fitnesses.is_empty() {
        return vec![];
    }
    let mean = fitnesses.iter().sum::<f64>() / fitnesses.len() as f64;
    fitnesses
        .iter()
        .map(|&f| {
            let w = if mean == 0.0 {
                pressure * f
            } else {
                pressure * f / mean
            };
            w.max(0.0)
        })
        .collect()
}

/// Spins the wheel `draws` times and returns the picked indices.
///
/// Draws are sorted before walking the cumulative weights, so the result is
/// ascending. An index is picked once per draw falling in its window;
/// zero-weight entries have empty windows. When the total weight is zero or
/// not finite every pick is uniform instead.
pub fn roulette<R>(weights: &[f64], draws: usize, rng: &mut R) -> Vec<usize>
where
    R: Rng + ?Sized,
{
    if weights.is_empty() || draws == 0 {
        return vec![];
    }

    let total = weights.iter().sum::<f64>();
    if !(total.is_finite() && total > 0.0) {
        log::debug!("roulette total weight is {total}; drawing uniformly");
        return (0..draws)
            .map(|_| rng.random_range(0..weights.len()))
            .collect();
    }

    let mut spins = (0..draws)
        .map(|_| rng.random::<f64>() * total)
        .collect::<Vec<_>>();
    spins.sort_by(f64::total_cmp);

    let last = weights.len() - 1;
    let mut index = 0;
    let mut upper = weights[0];
    spins
        .into_iter()
        .map(|spin| {
            while upper <= spin && index < last {
                index += 1;
                upper += weights[index];
            }
            index
        })
        .collect()
}

/// Index of the highest fitness. Ties go to the later index.
///
/// # Panics
///
/// Panics if `fitnesses` is empty.
#[must_use]
pub fn best_index(fitnesses: &[f64]) -> usize {
    fitnesses
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .expect("cannot select from an empty population")
}
