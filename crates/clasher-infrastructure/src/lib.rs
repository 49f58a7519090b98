//! Infrastructure layer for Clasher: file-backed configuration and secrets,
//! image file loading and download export writing.

pub mod config_service;
pub mod image_loader;
pub mod paths;
pub mod secret_service;
pub mod video_exporter;

pub use config_service::ConfigService;
pub use image_loader::ImageFileLoader;
pub use paths::ClasherPaths;
pub use secret_service::SecretServiceImpl;
pub use video_exporter::VideoExporter;
