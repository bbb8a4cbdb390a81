//! Capability Gating
//!
//! A capability tag is a member-less marker contract. Parameterized
//! decoration only applies to tuples where some argument carries the tag.

use cqx_domain::error::{Error, Result};
use cqx_domain::value_objects::{ContractShape, TypeIdentity, TypeRef};

/// A validated marker contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityTag {
    shape: ContractShape,
}

impl CapabilityTag {
    /// Validate `shape` as a marker
    ///
    /// Fails with `InvalidCapabilityTag` when the shape declares members.
    pub fn new(shape: ContractShape) -> Result<Self> {
        if shape.is_marker() {
            Ok(Self { shape })
        } else {
            Err(Error::invalid_capability_tag(
                shape.to_string(),
                shape.members().to_vec(),
            ))
        }
    }

    /// The marker's base identity
    pub fn base(&self) -> &TypeIdentity {
        self.shape.base()
    }

    /// The underlying shape
    pub fn shape(&self) -> &ContractShape {
        &self.shape
    }
}

/// Tests argument tuples against capability tags
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityMatcher;

impl CapabilityMatcher {
    /// True iff at least one argument implements `tag`
    pub fn satisfies(arguments: &[TypeRef], tag: &CapabilityTag) -> bool {
        arguments.iter().any(|argument| argument.implements(tag.base()))
    }
}
