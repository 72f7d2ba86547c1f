pub mod source;

pub use source::{Identifiers, IdentifyQuery, MetadataSource};
