//! Table actions and their parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use up4_types::ByteSequence;

use crate::{PiActionId, PiActionParamId, PiBuildError};

/// A named action parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PiActionParam {
    pub id: PiActionParamId,
    pub value: ByteSequence,
}

impl PiActionParam {
    pub fn new(id: PiActionParamId, value: ByteSequence) -> Self {
        Self { id, value }
    }
}

impl fmt::Display for PiActionParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.id, self.value)
    }
}

/// An action of a table entry: the action identifier and its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PiAction {
    id: PiActionId,
    #[serde(default)]
    params: Vec<PiActionParam>,
}

impl PiAction {
    pub fn builder() -> PiActionBuilder {
        PiActionBuilder::default()
    }

    pub fn id(&self) -> &PiActionId {
        &self.id
    }

    pub fn params(&self) -> &[PiActionParam] {
        &self.params
    }

    /// Returns the parameter with the given identifier, if present.
    pub fn param(&self, id: &PiActionParamId) -> Option<&PiActionParam> {
        self.params.iter().find(|p| &p.id == id)
    }
}

impl fmt::Display for PiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.id)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ")")
    }
}

/// Builder for actions.
#[derive(Debug, Clone, Default)]
pub struct PiActionBuilder {
    id: Option<PiActionId>,
    params: Vec<PiActionParam>,
}

impl PiActionBuilder {
    pub fn with_id(mut self, id: PiActionId) -> Self {
        self.id = Some(id);
        self
    }

    /// Adds a parameter, replacing any previous parameter with the same ID.
    pub fn with_parameter(mut self, param: PiActionParam) -> Self {
        match self.params.iter_mut().find(|p| p.id == param.id) {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
        self
    }

    pub fn build(self) -> Result<PiAction, PiBuildError> {
        let id = self.id.ok_or(PiBuildError::MissingActionId)?;
        Ok(PiAction {
            id,
            params: self.params,
        })
    }
}
