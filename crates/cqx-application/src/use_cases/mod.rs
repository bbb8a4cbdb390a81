//! Composition Use Cases
//!
//! - [`decoration`]: `decorate_fixed` / `decorate_parameterized`
//! - [`registration`]: `scan_and_register`

pub mod decoration;
pub mod registration;

pub use decoration::{DecorateFn, DecorationComposer, Decorator, GenericDecorateFn, GenericDecorator};
pub use registration::{
    RegistrationDispatcher, RegistrationFn, RegistrationOp, RegistrationTable, ScanReport,
    ShapeFamily, ShapeRegistrations,
};
