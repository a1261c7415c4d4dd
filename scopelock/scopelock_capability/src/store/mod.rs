mod registry;

pub use registry::ClassRegistry;
