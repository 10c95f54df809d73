pub mod resolver;
pub mod types;
pub mod validation;

pub use resolver::DescriptorResolver;
pub use types::{ContentBlockDescriptor, IconProviderKind};
pub use validation::{
    DescriptorValidator, StructuralValidator, ValidationError, ValidationReport,
};
