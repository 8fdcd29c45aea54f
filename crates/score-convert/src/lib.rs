mod convert;
mod error;
mod files;
mod project;

pub use convert::convert_workload_into;
pub use error::ConvertError;
pub use files::expand_files;
pub use project::{
    BindKind, BindMount, ComposeProject, ComposeService, ComposeVolume, NamedVolumeMount,
    PortMapping, ServiceVolumeMount,
};
