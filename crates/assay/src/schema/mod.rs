//! Schema descriptors and their derivation from reference tables.

mod builder;
mod descriptor;

pub use builder::{SchemaBuilder, resolve_item_column, split_unit};
pub use descriptor::SchemaDescriptor;
