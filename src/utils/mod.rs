pub mod render;
pub mod scanner;
pub mod server;
pub mod serverless;
