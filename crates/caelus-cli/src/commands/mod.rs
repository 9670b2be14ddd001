//! Command implementations.

pub mod assess;
pub mod check_graph;

pub use self::assess::execute_assess;
pub use self::check_graph::execute_check_graph;
