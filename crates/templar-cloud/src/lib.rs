pub mod docker;
pub mod error;
pub mod executor;
pub mod storage;

pub use docker::{DockerClient, DockerError};
pub use error::ExecError;
pub use executor::{Executor, RealExecutor};
pub use storage::{StorageClient, UploadError};
