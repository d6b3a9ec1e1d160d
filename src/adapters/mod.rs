pub mod local_storage;
pub mod round_robin;
pub mod shell_host;

pub use local_storage::LocalStorage;
pub use round_robin::RoundRobinPartitioner;
pub use shell_host::ShellHost;
