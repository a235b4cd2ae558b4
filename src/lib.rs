pub mod data_loader;
pub mod error;
pub mod ranking;
pub mod ranking_context;
pub mod report;
pub mod score;
pub mod standings;
pub mod util;

pub use data_loader::*;
pub use error::Error;
pub use ranking::*;
pub use ranking_context::*;
pub use report::*;
pub use score::*;
pub use standings::*;
