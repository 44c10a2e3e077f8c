pub mod api;
pub mod config;
pub mod corpus;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod layouts;
pub mod optimizer;
pub mod scorer;
