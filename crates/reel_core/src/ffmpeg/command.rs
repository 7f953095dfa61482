//! Structured ffmpeg command lines.
//!
//! File names come from the user's camera card and can contain spaces,
//! quotes or shell metacharacters. Arguments are therefore kept as
//! separate tokens all the way to `execve`.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

/// One external tool invocation.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    program: PathBuf,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

impl FfmpegCommand {
    /// Start a command for `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Append one argument token.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several argument tokens.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Append an option and its value.
    pub fn opt(self, name: &str, value: impl AsRef<OsStr>) -> Self {
        self.arg(name).arg(value)
    }

    /// Append an input (`-i <path>`).
    pub fn input(self, path: impl AsRef<Path>) -> Self {
        self.arg("-i").arg(path.as_ref())
    }

    /// Run the tool from `dir`; relative paths in arguments resolve there.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Short tool name for messages (`ffmpeg`).
    pub fn tool_name(&self) -> String {
        self.program
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Arguments as lossy strings.
    pub fn tokens(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    /// Human-readable command line for logs. Not meant to be re-parsed.
    pub fn display(&self) -> String {
        std::iter::once(self.program.to_string_lossy().to_string())
            .chain(self.tokens())
            .map(|t| quote_for_display(&t))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build the `std::process::Command`.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

fn quote_for_display(token: &str) -> String {
    if token.is_empty() {
        return "''".to_string();
    }
    if token
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '$' | '`' | '&' | ';' | '|'))
    {
        format!("'{}'", token.replace('\'', "'\\''"))
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_tokens_separate() {
        let cmd = FfmpegCommand::new("ffmpeg")
            .arg("-y")
            .input("/cards/My Trip/IMG 1.jpg")
            .opt("-r", "25")
            .arg("out.mpg");

        assert_eq!(
            cmd.tokens(),
            vec!["-y", "-i", "/cards/My Trip/IMG 1.jpg", "-r", "25", "out.mpg"]
        );
    }

    #[test]
    fn display_quotes_awkward_tokens() {
        let cmd = FfmpegCommand::new("ffmpeg")
            .input("a b.jpg")
            .arg("it's.mpg");
        assert_eq!(cmd.display(), "ffmpeg -i 'a b.jpg' 'it'\\''s.mpg'");
    }

    #[test]
    fn tool_name_strips_directory() {
        assert_eq!(FfmpegCommand::new("/usr/bin/ffmpeg").tool_name(), "ffmpeg");
    }

    #[test]
    fn to_command_carries_dir_and_args() {
        let cmd = FfmpegCommand::new("ffmpeg")
            .args(["-f", "concat"])
            .current_dir("/work");
        let std_cmd = cmd.to_command();

        assert_eq!(std_cmd.get_current_dir(), Some(Path::new("/work")));
        let args: Vec<&OsStr> = std_cmd.get_args().collect();
        assert_eq!(args, vec![OsStr::new("-f"), OsStr::new("concat")]);
    }
}
