pub mod http;
pub mod memory;
pub mod session_file;

pub use http::HttpGateway;
pub use memory::MemorySessionStorage;
pub use session_file::FileSessionStorage;
