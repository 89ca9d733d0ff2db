mod ffmpeg;

pub use ffmpeg::FfmpegMediaTool;
