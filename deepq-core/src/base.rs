//! Core functionalities.
mod env;
mod q_function;
mod step;
mod transition;
pub use env::Env;
pub use q_function::QFunction;
pub use step::Step;
pub use transition::Transition;
