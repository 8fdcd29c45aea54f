mod error;
mod resource_uid;
mod types;

pub use error::DomainError;
pub use resource_uid::ResourceUid;
pub use types::{
    ContainerSpec, FileMount, Metadata, Params, ResourceDeclaration, ServicePort,
    UnsupportedContainerFields, VolumeMount, Workload,
};
