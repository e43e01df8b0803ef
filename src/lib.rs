//! Builds the quiz index page from the `<root>/<year>/<grade>/sequence<N>/*.html` tree and serves
//! it next to the quiz files, either from a long-running server or a single serverless invocation.

pub mod config;
pub mod models;
pub mod utils;

pub use config::{Config, Deployment, Paths};
pub use models::{GradeLevel, Quiz, Sequence, Taxonomy};
pub use utils::render::render_page;
pub use utils::scanner::TaxonomyScanner;
