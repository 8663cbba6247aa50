//! ffmpeg process invocation
//!
//! Both the PCM loader and the non-WAV encoders shell out to `ffmpeg`. This
//! module builds their argument lists and runs the process to completion,
//! capturing stdout and stderr in full.

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;
use log::debug;
use crate::audio::OutputFormat;
use crate::config::{EncoderConfig, FfmpegConfig};

/// An ffmpeg command line, kept as data until it is run.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl FfmpegCommand {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Decode `input` to headerless mono f32le PCM at `sample_rate` on stdout.
    pub fn pcm_decode(config: &FfmpegConfig, input: &Path, sample_rate: u32) -> Self {
        Self::new(&config.binary)
            .arg("-nostdin")
            .args(["-threads".to_string(), config.threads.to_string()])
            .arg("-i")
            .arg(input)
            .args(["-f", "f32le", "-acodec", "pcm_f32le", "-ac", "1"])
            .args(["-ar".to_string(), sample_rate.to_string()])
            .arg("-")
    }

    /// Encode interleaved f32le PCM read from stdin into `output`.
    pub fn pcm_encode(
        config: &FfmpegConfig,
        encoder: &EncoderConfig,
        output: &Path,
        format: OutputFormat,
        sample_rate: u32,
        channels: usize,
    ) -> Self {
        let mut cmd = Self::new(&config.binary)
            .arg("-hide_banner")
            .args(["-loglevel", config.log_level.as_str()])
            .args(["-f", "f32le"])
            .args(["-ar".to_string(), sample_rate.to_string()])
            .args(["-ac".to_string(), channels.to_string()])
            .args(["-i", "pipe:0"])
            .args(["-threads".to_string(), config.threads.to_string()])
            .args(["-c:a", format.ffmpeg_codec()]);

        match format {
            OutputFormat::Mp3 => {
                cmd = cmd.args(["-b:a".to_string(), format!("{}k", encoder.mp3_bitrate_kbps)]);
            }
            OutputFormat::Mp4 => {
                cmd = cmd.args(["-b:a".to_string(), format!("{}k", encoder.aac_bitrate_kbps)]);
            }
            OutputFormat::Ogg => {
                cmd = cmd.args(["-q:a".to_string(), encoder.vorbis_quality.to_string()]);
            }
            OutputFormat::Wav | OutputFormat::Flac => {}
        }

        cmd.args(["-f", format.ffmpeg_muxer()]).arg("-y").arg(output)
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Run with stdin closed, capturing stdout and stderr.
    pub fn output(&self) -> std::io::Result<Output> {
        debug!("Running {}", self);
        self.to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
    }

    /// Run with `input` written to stdin, capturing stdout and stderr.
    ///
    /// Stdin is fed from a separate thread so a chatty child cannot
    /// deadlock on a full stderr pipe while we are still writing.
    pub fn output_with_stdin(&self, input: &[u8]) -> std::io::Result<Output> {
        debug!("Running {} with {} bytes on stdin", self, input.len());
        let mut child = self
            .to_command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdin = child.stdin.take();
        thread::scope(|scope| -> std::io::Result<Output> {
            let writer = scope.spawn(move || -> std::io::Result<()> {
                if let Some(mut stdin) = stdin {
                    match stdin.write_all(input) {
                        // the child exited early; its status tells the story
                        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                        other => other?,
                    }
                }
                Ok(())
            });

            let output = child.wait_with_output()?;
            match writer.join() {
                Ok(result) => result?,
                Err(_) => {
                    return Err(std::io::Error::other("stdin writer thread panicked"));
                }
            }
            Ok(output)
        })
    }
}

impl std::fmt::Display for FfmpegCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Whether `binary -version` runs successfully.
pub fn is_available(binary: &str) -> bool {
    Command::new(binary)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
