mod builder;
mod executor;

pub use builder::{TECHNIQUE_HEADER, build_request, validate_target};
pub use executor::{TIMEOUT_MESSAGE, execute_probe};
