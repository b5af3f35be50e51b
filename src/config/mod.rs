mod core;
mod loader;

pub use core::{default_annotation_extension, FilesConfig, PlaceholderConfig, StubmergeConfig};
pub use loader::{
    directory_ancestors, find_config, load_config, load_config_from, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
