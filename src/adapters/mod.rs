// Adapters layer: concrete implementations of the domain ports.

pub mod source;

pub use source::SourceReader;
