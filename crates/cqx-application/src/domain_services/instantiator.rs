//! Shape Instantiation
//!
//! Closes a parameterized identity (contract or decorator) over a concrete
//! argument tuple. Closing is fallible and side-effect free, so callers can
//! cheaply try a tuple and skip it when a constraint does not hold.

use cqx_domain::error::{Error, Result};
use cqx_domain::value_objects::{ContractKey, ContractShape, TypeRef};

/// Closes shapes over argument tuples
#[derive(Debug, Clone, Copy, Default)]
pub struct Instantiator;

impl Instantiator {
    /// Close `shape` over `arguments`
    ///
    /// # Errors
    ///
    /// - `ArityMismatch` when the argument count differs from the parameter count
    /// - `ArgumentConstraintViolation` for the first argument failing a
    ///   constraint declared on its position
    pub fn close(shape: &ContractShape, arguments: &[TypeRef]) -> Result<ContractKey> {
        if arguments.len() != shape.arity() {
            return Err(Error::arity_mismatch(
                shape.to_string(),
                shape.arity(),
                arguments.len(),
            ));
        }

        for (parameter, argument) in shape.parameters().iter().zip(arguments) {
            if let Some(violated) = parameter
                .constraints
                .iter()
                .find(|constraint| !constraint.is_satisfied_by(argument))
            {
                return Err(Error::constraint_violation(
                    shape.to_string(),
                    parameter.name.as_str(),
                    argument.identity().name(),
                    violated.to_string(),
                ));
            }
        }

        Ok(ContractKey::closed(shape.base().clone(), arguments.to_vec()))
    }

    /// Require a contract shape and its decorator shape to take the same number of parameters
    pub fn ensure_same_arity(contract: &ContractShape, decorator: &ContractShape) -> Result<()> {
        if contract.arity() == decorator.arity() {
            Ok(())
        } else {
            Err(Error::arity_mismatch(
                format!("{decorator} decorating {contract}"),
                contract.arity(),
                decorator.arity(),
            ))
        }
    }
}
