pub mod config;
pub mod debounce;
pub mod dimensions;
pub mod format;
pub mod image;
pub mod proportions;
pub mod provider;
pub mod state;
pub mod url;

pub use config::{Credentials, PoststackConfig, DEFAULT_ENDPOINT};
pub use image::*;
pub use proportions::{get_aspect_ratio, Proportions};
pub use provider::{provide_poststack_config, use_poststack_config};
