//! Contract Value Objects
//!
//! Closed contract keys, parameterized contract shapes, and the constraints
//! a shape may declare on its parameter positions.

use std::fmt;

use serde::{Serialize, Serializer};

use super::identity::{ArgumentTuple, TypeIdentity, TypeInfo, format_arguments};

/// Value Object: Contract Key
///
/// A base identity plus its ordered type arguments. Non-parameterized
/// contracts carry an empty argument list. Two keys are equal when the base
/// identities are equal and the argument lists are element-wise equal.
///
/// ## Example
///
/// ```rust
/// use cqx_domain::value_objects::{ContractKey, TypeIdentity, TypeInfo};
///
/// let ping = TypeInfo::concrete("Ping").into_ref();
/// let key = ContractKey::closed(TypeIdentity::new("Handler"), vec![ping]);
/// assert_eq!(key.to_string(), "Handler<Ping>");
/// assert_eq!(key.arity(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractKey {
    base: TypeIdentity,
    arguments: ArgumentTuple,
}

impl ContractKey {
    /// Key for a non-parameterized contract
    pub fn fixed(base: TypeIdentity) -> Self {
        Self {
            base,
            arguments: Vec::new(),
        }
    }

    /// Key for a contract closed over `arguments`
    ///
    /// No arity or constraint checks happen here; use the instantiator to
    /// close a [`ContractShape`] safely.
    pub fn closed(base: TypeIdentity, arguments: ArgumentTuple) -> Self {
        Self { base, arguments }
    }

    /// Key for a non-parameterized contract named after a Rust type
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::fixed(TypeIdentity::of::<T>())
    }

    /// The base identity
    pub fn base(&self) -> &TypeIdentity {
        &self.base
    }

    /// The ordered type arguments
    pub fn arguments(&self) -> &ArgumentTuple {
        &self.arguments
    }

    /// Number of type arguments
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// Whether the key carries type arguments
    pub fn is_parameterized(&self) -> bool {
        !self.arguments.is_empty()
    }
}

impl fmt::Display for ContractKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arguments.is_empty() {
            write!(f, "{}", self.base)
        } else {
            write!(f, "{}<{}>", self.base, format_arguments(&self.arguments))
        }
    }
}

impl Serialize for ContractKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Constraint declared on a parameter position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterConstraint {
    /// The argument must implement some closure of the given base contract
    Implements(TypeIdentity),
    /// The argument must be a fully concrete type
    Concrete,
}

impl ParameterConstraint {
    /// Whether `argument` satisfies this constraint
    pub fn is_satisfied_by(&self, argument: &TypeInfo) -> bool {
        match self {
            Self::Implements(base) => argument.implements(base),
            Self::Concrete => argument.is_concrete(),
        }
    }
}

impl fmt::Display for ParameterConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Implements(base) => write!(f, "implements {base}"),
            Self::Concrete => f.write_str("concrete"),
        }
    }
}

/// A named parameter position and its constraints
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParameter {
    /// Parameter name, e.g. `T`
    pub name: String,
    /// Constraints every argument bound here must satisfy
    pub constraints: Vec<ParameterConstraint>,
}

impl TypeParameter {
    /// Unconstrained parameter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
        }
    }
}

/// Identity of a shape: its base plus its arity
///
/// `Handler<T>` and `Handler<T, R>` share a base name but are distinct shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId {
    /// Base identity
    pub base: TypeIdentity,
    /// Parameter count
    pub arity: usize,
}

impl ShapeId {
    /// Whether `key` is a closure of this shape
    pub fn matches(&self, key: &ContractKey) -> bool {
        key.base() == &self.base && key.arity() == self.arity
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.arity)
    }
}

/// Value Object: Contract Shape
///
/// A possibly parameterized identity: a contract, a decorator, or a marker.
/// A shape with zero parameters is a fixed contract; a shape with zero
/// members is a pure marker usable as a capability tag.
///
/// ## Example
///
/// ```rust
/// use cqx_domain::value_objects::{ContractShape, ParameterConstraint, TypeIdentity};
///
/// let handler = ContractShape::parameterized("Handler", &["C"])
///     .constrain("C", ParameterConstraint::Implements(TypeIdentity::new("Command")))
///     .with_members(&["handle"]);
/// assert_eq!(handler.arity(), 1);
/// assert_eq!(handler.to_string(), "Handler<C>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractShape {
    base: TypeIdentity,
    parameters: Vec<TypeParameter>,
    members: Vec<String>,
}

impl ContractShape {
    /// A non-parameterized shape
    pub fn fixed(base: impl AsRef<str>) -> Self {
        Self::new(TypeIdentity::new(base), Vec::new())
    }

    /// A shape with unconstrained parameters named `parameters`
    pub fn parameterized(base: impl AsRef<str>, parameters: &[&str]) -> Self {
        Self::new(
            TypeIdentity::new(base),
            parameters.iter().map(|p| TypeParameter::new(*p)).collect(),
        )
    }

    /// A shape with explicit parameters
    pub fn new(base: TypeIdentity, parameters: Vec<TypeParameter>) -> Self {
        Self {
            base,
            parameters,
            members: Vec::new(),
        }
    }

    /// Add a constraint to the named parameter; unknown names are ignored
    pub fn constrain(mut self, parameter: &str, constraint: ParameterConstraint) -> Self {
        if let Some(p) = self.parameters.iter_mut().find(|p| p.name == parameter) {
            p.constraints.push(constraint);
        }
        self
    }

    /// Declare the shape's members
    pub fn with_members(mut self, members: &[&str]) -> Self {
        self.members = members.iter().map(|m| (*m).to_string()).collect();
        self
    }

    /// The base identity
    pub fn base(&self) -> &TypeIdentity {
        &self.base
    }

    /// Parameter positions in order
    pub fn parameters(&self) -> &[TypeParameter] {
        &self.parameters
    }

    /// Declared members
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Parameter count
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Whether the shape has parameters
    pub fn is_parameterized(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Whether the shape is a pure marker
    pub fn is_marker(&self) -> bool {
        self.members.is_empty()
    }

    /// The shape's (base, arity) identity
    pub fn id(&self) -> ShapeId {
        ShapeId {
            base: self.base.clone(),
            arity: self.arity(),
        }
    }

    /// Whether `key` is a closure of this shape
    pub fn matches(&self, key: &ContractKey) -> bool {
        key.base() == &self.base && key.arity() == self.arity()
    }

    /// The key of a fixed shape, `None` when the shape has parameters
    pub fn fixed_key(&self) -> Option<ContractKey> {
        (!self.is_parameterized()).then(|| ContractKey::fixed(self.base.clone()))
    }
}

impl fmt::Display for ContractShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parameters.is_empty() {
            write!(f, "{}", self.base)
        } else {
            let names: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();
            write!(f, "{}<{}>", self.base, names.join(", "))
        }
    }
}
