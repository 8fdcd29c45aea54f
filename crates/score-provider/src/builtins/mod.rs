mod counter;
mod environment;
mod placeholder_env;
mod static_outputs;
mod volume;

pub use counter::CounterProvider;
pub use environment::EnvironmentProvider;
pub use placeholder_env::PlaceholderEnvProvider;
pub use static_outputs::StaticOutputsProvider;
pub use volume::VolumeProvider;
