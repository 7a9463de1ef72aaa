/**
 * SOURCE ALÉATOIRE - Tirages uniformes injectables pour la simulation
 *
 * RÔLE : Abstraire le générateur pour que les tests fournissent des
 * séquences fixes (SequenceRandom) et que la prod utilise StdRng.
 *
 * MARCHE ALÉATOIRE : random_variation(base, range) = clamp(base + (u - 0.5) * range, 0, 100)
 * Le clamp [0,100] s'applique à toutes les métriques, y compris la vibration x10.
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fournit des tirages uniformes dans [0, 1)
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

/// Générateur de production, seedable pour rejouer une session
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Rejoue une liste fixe de tirages, en boucle
#[cfg(test)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

#[cfg(test)]
impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "SequenceRandom needs at least one value");
        Self { values, cursor: 0 }
    }

    /// Tirage constant : toutes les variations valent (value - 0.5) * range
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

#[cfg(test)]
impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

pub const WALK_MIN: f64 = 0.0;
pub const WALK_MAX: f64 = 100.0;

pub fn random_variation(base: f64, range: f64, rng: &mut dyn RandomSource) -> f64 {
    let offset = (rng.next_unit() - 0.5) * range;
    (base + offset).clamp(WALK_MIN, WALK_MAX)
}

/// Arrondi à `digits` décimales (équivalent Number(x.toFixed(digits)))
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}
