pub mod agent;
pub mod color;
pub mod data;
pub mod history;
pub mod prelude;
pub mod solver;

pub use agent::*;
pub use color::*;
pub use data::*;
pub use history::*;
pub use prelude::*;
pub use solver::*;
