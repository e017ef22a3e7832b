//! # Layer widths
//!
//! A network described as an ordered list of hidden-layer widths. Depth varies
//! between genomes, from one layer up to the space's `max_layers`.

use std::fmt;

use super::{Architecture, SearchSpace};
use crate::{
    error::{EvolveError, Result},
    rng::RandomNumberGenerator,
};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpace {
    neuron_choices: Vec<u32>,
    max_layers: usize,
}

impl LayerSpace {
    /// # Errors
    ///
    /// Returns a configuration error if `neuron_choices` is empty, holds a zero
    /// or a duplicate width, or if `max_layers` is zero.
    pub fn new(neuron_choices: Vec<u32>, max_layers: usize) -> Result<Self> {
        let space = Self {
            neuron_choices,
            max_layers,
        };
        space.validate()?;
        Ok(space)
    }

    pub fn neuron_choices(&self) -> &[u32] {
        &self.neuron_choices
    }

    pub fn max_layers(&self) -> usize {
        self.max_layers
    }
}

impl SearchSpace for LayerSpace {
    fn validate(&self) -> Result<()> {
        if self.neuron_choices.is_empty() {
            return Err(EvolveError::Configuration(
                "Layer space has no neuron choices".to_string(),
            ));
        }
        if self.neuron_choices.contains(&0) {
            return Err(EvolveError::Configuration(
                "Layer width cannot be zero".to_string(),
            ));
        }
        for (i, width) in self.neuron_choices.iter().enumerate() {
            if self.neuron_choices[..i].contains(width) {
                return Err(EvolveError::Configuration(format!(
                    "Layer width {} is listed twice",
                    width
                )));
            }
        }
        if self.max_layers == 0 {
            return Err(EvolveError::Configuration(
                "Maximum number of layers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LayerSpace {
    fn default() -> Self {
        Self {
            neuron_choices: vec![64, 128, 256, 512, 768, 1024],
            max_layers: 4,
        }
    }
}

/// Hidden-layer widths, input side first. Never empty.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<u32>", into = "Vec<u32>")
)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerWidths(Vec<u32>);

impl LayerWidths {
    /// # Errors
    ///
    /// Returns a configuration error for an empty list or a zero width.
    pub fn new(widths: Vec<u32>) -> Result<Self> {
        if widths.is_empty() {
            return Err(EvolveError::Configuration(
                "A network needs at least one layer".to_string(),
            ));
        }
        if widths.contains(&0) {
            return Err(EvolveError::Configuration(
                "Layer width cannot be zero".to_string(),
            ));
        }
        Ok(Self(widths))
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn widths(&self) -> &[u32] {
        &self.0
    }

    /// Width of layer `index`, or of the last layer when `index` runs past it.
    fn clamped(&self, index: usize) -> u32 {
        self.0[index.min(self.0.len() - 1)]
    }
}

impl TryFrom<Vec<u32>> for LayerWidths {
    type Error = EvolveError;

    fn try_from(widths: Vec<u32>) -> Result<Self> {
        Self::new(widths)
    }
}

impl From<LayerWidths> for Vec<u32> {
    fn from(widths: LayerWidths) -> Self {
        widths.0
    }
}

impl fmt::Display for LayerWidths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Architecture for LayerWidths {
    type Space = LayerSpace;

    fn random(space: &LayerSpace, rng: &mut RandomNumberGenerator) -> Self {
        let choices = &space.neuron_choices;
        let depth = rng.gen_range(1..=space.max_layers);
        let widths = (0..depth)
            .map(|_| choices[rng.index(choices.len())])
            .collect();
        Self(widths)
    }

    /// Child depth is one of the parents' depths. Each position copies the
    /// mother's or the father's width with equal odds, clamping to the parent's
    /// last layer when the child is deeper than that parent.
    fn crossover(&self, other: &Self, rng: &mut RandomNumberGenerator) -> Self {
        let depth = if rng.coin_flip() {
            self.depth()
        } else {
            other.depth()
        };

        let widths = (0..depth)
            .map(|i| {
                if rng.coin_flip() {
                    self.clamped(i)
                } else {
                    other.clamped(i)
                }
            })
            .collect();
        Self(widths)
    }

    fn mutate(&mut self, space: &LayerSpace, rng: &mut RandomNumberGenerator) {
        let layer = rng.index(self.0.len());
        if let Some(width) = rng.choose(&space.neuron_choices) {
            self.0[layer] = *width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Genome;

    #[test]
    fn test_space_validation() {
        assert!(LayerSpace::new(vec![64, 128], 3).is_ok());
        assert!(matches!(
            LayerSpace::new(vec![], 3),
            Err(EvolveError::Configuration(_))
        ));
        assert!(matches!(
            LayerSpace::new(vec![64, 0], 3),
            Err(EvolveError::Configuration(_))
        ));
        assert!(matches!(
            LayerSpace::new(vec![64, 64], 3),
            Err(EvolveError::Configuration(_))
        ));
        assert!(matches!(
            LayerSpace::new(vec![64], 0),
            Err(EvolveError::Configuration(_))
        ));
    }

    #[test]
    fn test_random_genome_checks_space() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        let unusable = [
            LayerSpace {
                neuron_choices: vec![],
                max_layers: 2,
            },
            LayerSpace {
                neuron_choices: vec![64],
                max_layers: 0,
            },
        ];

        for space in &unusable {
            let result: Result<Genome<LayerWidths>> = Genome::random(space, &mut rng);
            assert!(matches!(result, Err(EvolveError::Configuration(_))));
        }

        let genome: Genome<LayerWidths> =
            Genome::random(&LayerSpace::default(), &mut rng).unwrap();
        assert!(genome.architecture().depth() >= 1);
        assert!(!genome.is_evaluated());
    }

    #[test]
    fn test_zero_depth_rejected() {
        assert!(matches!(
            LayerWidths::new(vec![]),
            Err(EvolveError::Configuration(_))
        ));
        assert!(LayerWidths::new(vec![0]).is_err());
        assert_eq!(LayerWidths::new(vec![32, 16]).unwrap().depth(), 2);
    }

    #[test]
    fn test_random_respects_space() {
        let space = LayerSpace::default();
        let mut rng = RandomNumberGenerator::from_seed(3);
        let mut depths = std::collections::HashSet::new();

        for _ in 0..500 {
            let net = LayerWidths::random(&space, &mut rng);
            assert!((1..=space.max_layers()).contains(&net.depth()));
            assert!(net
                .widths()
                .iter()
                .all(|w| space.neuron_choices().contains(w)));
            depths.insert(net.depth());
        }

        assert_eq!(depths.len(), space.max_layers());
    }

    #[test]
    fn test_crossover_positions_come_from_parents() {
        let mother = LayerWidths::new(vec![10, 20, 30, 40]).unwrap();
        let father = LayerWidths::new(vec![1]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(8);

        for _ in 0..500 {
            let child = mother.crossover(&father, &mut rng);
            assert!(child.depth() == mother.depth() || child.depth() == father.depth());

            for (i, width) in child.widths().iter().enumerate() {
                let from_mother = mother.clamped(i);
                let from_father = father.clamped(i);
                assert!(*width == from_mother || *width == from_father);
            }
        }
    }

    #[test]
    fn test_crossover_clamps_to_shallow_parent() {
        let mother = LayerWidths::new(vec![7]).unwrap();
        let father = LayerWidths::new(vec![100, 200, 300]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(2);

        let deep_children: Vec<LayerWidths> = (0..200)
            .map(|_| mother.crossover(&father, &mut rng))
            .filter(|c| c.depth() == 3)
            .collect();

        assert!(!deep_children.is_empty());
        for child in deep_children {
            assert!(child.widths()[2] == 7 || child.widths()[2] == 300);
        }
    }

    #[test]
    fn test_mutation_keeps_depth_and_domain() {
        let space = LayerSpace::new(vec![8, 16, 32], 5).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(4);
        let mut net = LayerWidths::random(&space, &mut rng);
        let depth = net.depth();

        for _ in 0..200 {
            let before = net.clone();
            net.mutate(&space, &mut rng);

            assert_eq!(net.depth(), depth);
            assert!(net.widths().iter().all(|w| space.neuron_choices().contains(w)));
            let changed = before
                .widths()
                .iter()
                .zip(net.widths())
                .filter(|(a, b)| a != b)
                .count();
            assert!(changed <= 1);
        }
    }
}
