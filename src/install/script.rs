use crate::install::shortcut::ShortcutTarget;
use std::io;
use std::path::Path;
use std::process::{Command, Output};

/// What a script host reported after running a generated script. Only used
/// for logging: whether the shortcut exists is checked on disk afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutcome {
    pub code: Option<i32>,
    pub output: String,
}

impl ScriptOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    fn from_output(out: Output) -> Self {
        let mut text = String::from_utf8_lossy(&out.stdout).trim().to_string();
        let err = String::from_utf8_lossy(&out.stderr);
        if !err.trim().is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(err.trim());
        }
        Self {
            code: out.status.code(),
            output: text,
        }
    }
}

/// A system interpreter able to turn a small generated script into a shortcut.
pub trait ScriptHost {
    /// Suffix for the temporary script file, including the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, link: &Path, target: &ShortcutTarget) -> String;

    fn encode(&self, script: &str) -> Vec<u8> {
        script.as_bytes().to_vec()
    }

    fn run(&self, script: &Path) -> io::Result<ScriptOutcome>;
}

#[cfg(windows)]
pub type PlatformHost = WshHost;
#[cfg(not(windows))]
pub type PlatformHost = ShellHost;

/// Windows Script Host: a VBScript run through `cscript.exe`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WshHost;

impl ScriptHost for WshHost {
    fn extension(&self) -> &'static str {
        ".vbs"
    }

    fn render(&self, link: &Path, target: &ShortcutTarget) -> String {
        let link = vbs_quote(&link.display().to_string());
        let exe = vbs_quote(&target.executable_path.display().to_string());
        let dir = vbs_quote(&target.working_directory.display().to_string());
        let desc = vbs_quote(&target.description);
        format!(
            "Set oWS = WScript.CreateObject(\"WScript.Shell\")\r\n\
             Set oLink = oWS.CreateShortcut({link})\r\n\
             oLink.TargetPath = {exe}\r\n\
             oLink.WorkingDirectory = {dir}\r\n\
             oLink.Description = {desc}\r\n\
             oLink.Save\r\n"
        )
    }

    // WSH reads UTF-16LE with a BOM reliably; UTF-8 depends on the code page.
    fn encode(&self, script: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in script.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    fn run(&self, script: &Path) -> io::Result<ScriptOutcome> {
        let root = std::env::var_os("SystemRoot").unwrap_or_else(|| "C:\\Windows".into());
        let cscript = Path::new(&root).join("System32").join("cscript.exe");

        let mut cmd = Command::new(cscript);
        cmd.arg("//nologo").arg(script);
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x08000000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }
        cmd.output().map(ScriptOutcome::from_output)
    }
}

/// POSIX shell writing a freedesktop `.desktop` entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellHost;

impl ScriptHost for ShellHost {
    fn extension(&self) -> &'static str {
        ".sh"
    }

    fn render(&self, link: &Path, target: &ShortcutTarget) -> String {
        let link = sh_quote(&link.display().to_string());
        let exec = desktop_exec_quote(&target.executable_path.display().to_string());
        let dir = target.working_directory.display();
        format!(
            "#!/bin/sh\n\
             set -e\n\
             cat > {link} <<'CORE_MUSIC_ENTRY'\n\
             [Desktop Entry]\n\
             Type=Application\n\
             Version=1.0\n\
             Name={name}\n\
             Comment={comment}\n\
             Exec={exec}\n\
             Path={dir}\n\
             Terminal=true\n\
             Categories=AudioVideo;Audio;Player;\n\
             CORE_MUSIC_ENTRY\n\
             chmod +x {link}\n",
            name = target.display_name,
            comment = target.description,
        )
    }

    fn run(&self, script: &Path) -> io::Result<ScriptOutcome> {
        Command::new("sh")
            .arg(script)
            .output()
            .map(ScriptOutcome::from_output)
    }
}

fn vbs_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn sh_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

fn desktop_exec_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
