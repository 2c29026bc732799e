//! Domain types.

mod namespace;
mod pvc;
mod role;
mod service;
mod tag;
mod variable;

pub use namespace::Namespace;
pub use pvc::PvcSize;
pub use role::Role;
pub use service::{PortSource, ServiceDescriptor};
pub use tag::ImageTag;
pub use variable::EnvVariable;
