//! # openapi-mock-core
//!
//! Resolve OpenAPI / JSON Schema nodes into mock value descriptions: faker
//! expressions that produce realistic fake data of the right shape, plus the
//! imports those expressions need. A code generator renders the result into
//! mock-server response handlers.
//!
//! Resolution is a recursive descent over the schema graph:
//!
//! 1. [`value::resolve_mock_value`] dereferences `$ref` nodes through
//!    [`resolver::ref_info`], keeping the referencing node's name and path.
//! 2. A [`scalar::ScalarResolver`] turns the concrete node into a
//!    [`MockValue`], recursing back into step 1 for properties, items and
//!    combinator members.
//! 3. User [`overrides`] short-circuit generation for matching nodes, and
//!    [`nullable`] wrappers add `null` / `undefined` alternatives.
//!
//! Resolution never mutates the loaded documents. The only mutable state is
//! the imports accumulator passed down one top-level resolution.

pub mod config;
pub mod context;
pub mod error;
pub mod generator;
pub mod mock;
pub mod nullable;
pub mod observer;
pub mod overrides;
pub mod resolver;
pub mod scalar;
pub mod schema;
pub mod schema_utils;
pub mod value;

pub use config::{MockConfig, MockOptions, OverrideScope};
pub use context::{MockContext, SpecStore};
pub use error::MockError;
pub use generator::{MockGenerator, OperationFailure, OperationMock, ResolvedMock};
pub use mock::{GeneratorImport, MockDefinition, MockProperty, MockValue};
pub use nullable::{wrap_nullable, wrap_optional};
pub use observer::{NoopObserver, ResolveObserver, TracingObserver};
pub use overrides::{OperationScope, OverrideMap, OverrideSet, OverrideTable};
pub use resolver::{ref_info, RefInfo};
pub use scalar::{FakerScalarResolver, ScalarResolver};
pub use schema::{CombineContext, Combinator, SchemaKind, SchemaNode, SchemaType};
pub use value::resolve_mock_value;
