pub mod classpath;
pub mod dedupe;
pub mod resolver;
pub mod validate;

pub use classpath::{
    classpath_separator, normalize_path, AddOptions, AddRejection, Classpath,
};
pub use dedupe::dedupe;
pub use resolver::{Diagnostic, Resolution, ResolveReport, Resolver};
pub use validate::is_valid;
