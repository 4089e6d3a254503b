pub mod file;
pub mod traits;

pub use file::FileRepository;
pub use traits::{Record, Repository};
