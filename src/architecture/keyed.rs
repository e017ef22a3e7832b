//! # Keyed hyperparameters
//!
//! One value per named hyperparameter. The set of names is closed
//! ([`Param`]) and every value is typed ([`Value`]), so a [`ParameterSpace`]
//! is checked once when it is built and never again per access.
//!
//! ```rust
//! use hyperevo::architecture::Architecture;
//! use hyperevo::architecture::keyed::{Activation, HyperParams, Param, ParameterSpace, Value};
//! use hyperevo::rng::RandomNumberGenerator;
//!
//! let space = ParameterSpace::builder()
//!     .choices(Param::NbNeurons, [64u32, 128])
//!     .choices(Param::Activation, [Activation::Relu, Activation::Tanh])
//!     .build()
//!     .unwrap();
//!
//! let mut rng = RandomNumberGenerator::from_seed(11);
//! let params = HyperParams::random(&space, &mut rng);
//!
//! assert!(matches!(params.get(Param::NbNeurons), Some(Value::Count(64 | 128))));
//! assert!(params.get(Param::Optimizer).is_none());
//! ```

use std::{collections::BTreeMap, fmt};

use super::{Architecture, SearchSpace};
use crate::{
    error::{EvolveError, Result},
    rng::RandomNumberGenerator,
};

/// The closed set of tunable hyperparameters.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Param {
    NbNeurons,
    NbLayers,
    Activation,
    Optimizer,
}

impl Param {
    pub const ALL: [Param; 4] = [
        Param::NbNeurons,
        Param::NbLayers,
        Param::Activation,
        Param::Optimizer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Param::NbNeurons => "nb_neurons",
            Param::NbLayers => "nb_layers",
            Param::Activation => "activation",
            Param::Optimizer => "optimizer",
        }
    }

    /// Whether `value` is of the kind this parameter takes.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Param::NbNeurons | Param::NbLayers, Value::Count(n)) => *n >= 1,
            (Param::Activation, Value::Activation(_)) => true,
            (Param::Optimizer, Value::Optimizer(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Activation {
    Relu,
    Elu,
    Tanh,
    Sigmoid,
}

impl Activation {
    pub const ALL: [Activation; 4] = [
        Activation::Relu,
        Activation::Elu,
        Activation::Tanh,
        Activation::Sigmoid,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Activation::Relu => "relu",
            Activation::Elu => "elu",
            Activation::Tanh => "tanh",
            Activation::Sigmoid => "sigmoid",
        }
    }
}

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Optimizer {
    Rmsprop,
    Adam,
    Sgd,
    Adagrad,
    Adadelta,
    Adamax,
    Nadam,
}

impl Optimizer {
    pub const ALL: [Optimizer; 7] = [
        Optimizer::Rmsprop,
        Optimizer::Adam,
        Optimizer::Sgd,
        Optimizer::Adagrad,
        Optimizer::Adadelta,
        Optimizer::Adamax,
        Optimizer::Nadam,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Optimizer::Rmsprop => "rmsprop",
            Optimizer::Adam => "adam",
            Optimizer::Sgd => "sgd",
            Optimizer::Adagrad => "adagrad",
            Optimizer::Adadelta => "adadelta",
            Optimizer::Adamax => "adamax",
            Optimizer::Nadam => "nadam",
        }
    }
}

/// A single hyperparameter value.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// A width or a depth.
    Count(u32),
    Activation(Activation),
    Optimizer(Optimizer),
}

impl From<u32> for Value {
    fn from(count: u32) -> Self {
        Value::Count(count)
    }
}

impl From<Activation> for Value {
    fn from(activation: Activation) -> Self {
        Value::Activation(activation)
    }
}

impl From<Optimizer> for Value {
    fn from(optimizer: Optimizer) -> Self {
        Value::Optimizer(optimizer)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Count(n) => write!(f, "{}", n),
            Value::Activation(a) => f.write_str(a.name()),
            Value::Optimizer(o) => f.write_str(o.name()),
        }
    }
}

/// Legal values for each declared hyperparameter.
///
/// Only the parameters present in the space are searched; a configuration
/// drawn from it carries exactly those keys.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpace {
    domains: BTreeMap<Param, Vec<Value>>,
}

impl ParameterSpace {
    /// Builds a space from `(parameter, domain)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no parameter is declared, a parameter
    /// is declared twice, a domain is empty, holds a duplicate, or holds a
    /// value of the wrong kind.
    pub fn new<I>(domains: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Param, Vec<Value>)>,
    {
        let mut map = BTreeMap::new();
        for (param, values) in domains {
            if map.insert(param, values).is_some() {
                return Err(EvolveError::Configuration(format!(
                    "Parameter '{}' is declared more than once",
                    param
                )));
            }
        }

        let space = Self { domains: map };
        space.validate()?;
        Ok(space)
    }

    pub fn builder() -> ParameterSpaceBuilder {
        ParameterSpaceBuilder::default()
    }

    /// The legal values of `param`, if it is part of the space.
    pub fn domain(&self, param: Param) -> Option<&[Value]> {
        self.domains.get(&param).map(Vec::as_slice)
    }

    /// The declared parameters, in their canonical order.
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.domains.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Whether `value` is one of the declared values of `param`.
    pub fn contains(&self, param: Param, value: &Value) -> bool {
        self.domain(param)
            .map_or(false, |domain| domain.contains(value))
    }
}

impl SearchSpace for ParameterSpace {
    fn validate(&self) -> Result<()> {
        if self.domains.is_empty() {
            return Err(EvolveError::Configuration(
                "Parameter space declares no parameters".to_string(),
            ));
        }

        for (param, values) in &self.domains {
            if values.is_empty() {
                return Err(EvolveError::Configuration(format!(
                    "Parameter '{}' has an empty domain",
                    param
                )));
            }

            if let Some(bad) = values.iter().find(|v| !param.accepts(v)) {
                return Err(EvolveError::Configuration(format!(
                    "Value '{}' is not a legal '{}'",
                    bad, param
                )));
            }

            for (i, value) in values.iter().enumerate() {
                if values[..i].contains(value) {
                    return Err(EvolveError::Configuration(format!(
                        "Value '{}' is listed twice for '{}'",
                        value, param
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for ParameterSpace {
    /// The classic MLP search space: six widths, one to four layers, four
    /// activations and seven optimizers.
    fn default() -> Self {
        let mut domains = BTreeMap::new();
        domains.insert(
            Param::NbNeurons,
            [64u32, 128, 256, 512, 768, 1024].map(Value::from).to_vec(),
        );
        domains.insert(Param::NbLayers, [1u32, 2, 3, 4].map(Value::from).to_vec());
        domains.insert(Param::Activation, Activation::ALL.map(Value::from).to_vec());
        domains.insert(Param::Optimizer, Optimizer::ALL.map(Value::from).to_vec());
        Self { domains }
    }
}

/// Fluent construction of a [`ParameterSpace`].
#[derive(Debug, Clone, Default)]
pub struct ParameterSpaceBuilder {
    domains: Vec<(Param, Vec<Value>)>,
}

impl ParameterSpaceBuilder {
    /// Declares `param` with the given legal values.
    pub fn choices<I, V>(mut self, param: Param, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.domains
            .push((param, values.into_iter().map(Into::into).collect()));
        self
    }

    pub fn build(self) -> Result<ParameterSpace> {
        ParameterSpace::new(self.domains)
    }
}

/// A configuration holding one value per declared hyperparameter.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HyperParams {
    values: BTreeMap<Param, Value>,
}

impl HyperParams {
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (Param, Value)>,
    {
        Self {
            values: values.into_iter().collect(),
        }
    }

    pub fn get(&self, param: Param) -> Option<&Value> {
        self.values.get(&param)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Param, &Value)> {
        self.values.iter().map(|(param, value)| (*param, value))
    }

    pub fn neurons(&self) -> Option<u32> {
        match self.get(Param::NbNeurons)? {
            Value::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn layers(&self) -> Option<u32> {
        match self.get(Param::NbLayers)? {
            Value::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn activation(&self) -> Option<Activation> {
        match self.get(Param::Activation)? {
            Value::Activation(a) => Some(*a),
            _ => None,
        }
    }

    pub fn optimizer(&self) -> Option<Optimizer> {
        match self.get(Param::Optimizer)? {
            Value::Optimizer(o) => Some(*o),
            _ => None,
        }
    }
}

impl fmt::Display for HyperParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (param, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", param, value)?;
        }
        f.write_str("}")
    }
}

impl Architecture for HyperParams {
    type Space = ParameterSpace;

    fn random(space: &ParameterSpace, rng: &mut RandomNumberGenerator) -> Self {
        let values = space
            .domains
            .iter()
            .filter_map(|(param, domain)| rng.choose(domain).map(|value| (*param, *value)))
            .collect();
        Self { values }
    }

    /// Uniform crossover: every key is copied from either parent with equal odds.
    fn crossover(&self, other: &Self, rng: &mut RandomNumberGenerator) -> Self {
        let values = self
            .values
            .iter()
            .map(|(param, mine)| {
                let value = match other.values.get(param) {
                    Some(theirs) if !rng.coin_flip() => *theirs,
                    _ => *mine,
                };
                (*param, value)
            })
            .collect();
        Self { values }
    }

    fn mutate(&mut self, space: &ParameterSpace, rng: &mut RandomNumberGenerator) {
        let params: Vec<Param> = space.params().collect();
        let Some(param) = rng.choose(&params).copied() else {
            return;
        };
        if let Some(value) = space.domain(param).and_then(|domain| rng.choose(domain)) {
            self.values.insert(param, *value);
        }
    }
}
