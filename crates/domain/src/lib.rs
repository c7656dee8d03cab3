//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod capability;
mod filter;
mod filter_expression;
mod paging;
mod principal;
mod screen;

pub use capability::{Capability, CapabilityDescriptor, CapabilitySet};
pub use filter::{
    CompiledExpression, DateRangeValue, FieldPath, FilterField, FilterFieldKind, FilterSpec,
    FilterState, FilterValue,
};
pub use filter_expression::{FilterExpressionCompiler, escape_literal};
pub use paging::{PageRequest, PageResult, PageSize, TotalCount};
pub use principal::{Principal, PrincipalRole};
pub use screen::{ListScreen, ScreenCapabilities};
