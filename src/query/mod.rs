// Query module - validates the SELECT, filters rows and renders matches
pub mod executor;
pub mod filter;
pub mod parser;

pub use executor::Scanner;
pub use filter::Filter;
pub use parser::QueryParser;
