pub mod paths;
pub mod route;
