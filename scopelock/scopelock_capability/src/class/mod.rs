mod resource_class;

pub use resource_class::{LockScoped, ResourceClass, ResourceClassBuilder};
