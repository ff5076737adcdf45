pub mod finding;
pub mod request;
pub mod result;
pub mod report;

pub use finding::*;
pub use request::*;
pub use result::*;
pub use report::*;
