// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fs_scanner;
pub mod probe_ffprobe;
pub mod process;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FfmpegConcatAdapter;
pub use fs_scanner::FsScannerAdapter;
pub use probe_ffprobe::FfprobeAdapter;
pub use toml_config::TomlConfigAdapter;
pub use tracing_log::TracingLogAdapter;
