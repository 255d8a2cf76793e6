pub mod runtime;

pub use runtime::required_java_for_minecraft_version;
pub use runtime::JavaInstallation;
pub use runtime::JavaRuntime;
