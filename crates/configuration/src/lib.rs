pub mod configuration;
pub mod environment;
pub mod error;
pub mod values;
pub mod version1;

pub use configuration::Configuration;
pub use values::{ConnectionUri, Secret};
pub use version1::{
    make_runtime_configuration, parse_configuration, write_parsed_configuration,
    ParsedConfiguration,
};
