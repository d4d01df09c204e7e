pub mod compare;
pub mod dump;
mod output;
