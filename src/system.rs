use std::env;
use std::path::Path;

/// Shell families, each with its own "run this string" flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellType {
    Cmd,        // Windows Command Prompt
    PowerShell, // Windows PowerShell or PowerShell Core
    UnixLike,   // Bash, Zsh, Sh, etc.
    Fish,
}

/// Facts about the machine the assistant runs on
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os_info: String,
    pub shell_path: String,
    pub shell_type: ShellType,
    pub username: String,
}

impl SystemInfo {
    pub fn detect() -> Self {
        let os = os_info::get();
        let os_info = format!("{} {} {}", os.os_type(), os.version(), os.bitness());

        let (shell_path, shell_type) = detect_shell(|name| env::var(name).ok());

        SystemInfo {
            os_info,
            shell_path,
            shell_type,
            username: detect_username(|name| env::var(name).ok()),
        }
    }
}

fn detect_username<F>(var: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ["USER", "USERNAME", "LOGNAME"]
        .into_iter()
        .filter_map(|name| var(name))
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "there".to_string())
}

fn detect_shell<F>(var: F) -> (String, ShellType)
where
    F: Fn(&str) -> Option<String>,
{
    if cfg!(target_os = "windows") {
        if var("PSModulePath").is_some() {
            if let Some(posh_path) = var("POSH_EXECUTABLE") {
                if Path::new(&posh_path).exists() {
                    return (posh_path, ShellType::PowerShell);
                }
            }
            return ("powershell.exe".to_string(), ShellType::PowerShell);
        }
        (
            var("COMSPEC").unwrap_or_else(|| "cmd.exe".to_string()),
            ShellType::Cmd,
        )
    } else {
        let shell_path = var("SHELL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "/bin/sh".to_string());
        let shell_type = shell_type_for(&shell_path);
        (shell_path, shell_type)
    }
}

fn shell_type_for(shell_path: &str) -> ShellType {
    let shell_name = Path::new(shell_path)
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("sh")
        .to_lowercase();

    match shell_name.as_str() {
        "fish" => ShellType::Fish,
        "pwsh" | "powershell" => ShellType::PowerShell,
        "cmd" => ShellType::Cmd,
        _ => ShellType::UnixLike,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_type_from_path() {
        assert_eq!(shell_type_for("/usr/bin/fish"), ShellType::Fish);
        assert_eq!(shell_type_for("/bin/zsh"), ShellType::UnixLike);
        assert_eq!(shell_type_for("/usr/local/bin/pwsh"), ShellType::PowerShell);
    }

    #[cfg(unix)]
    #[test]
    fn unix_shell_falls_back_to_sh() {
        let (path, kind) = detect_shell(|_| None);
        assert_eq!(path, "/bin/sh");
        assert_eq!(kind, ShellType::UnixLike);

        let (path, kind) = detect_shell(|name| (name == "SHELL").then(|| "/usr/bin/fish".into()));
        assert_eq!(path, "/usr/bin/fish");
        assert_eq!(kind, ShellType::Fish);
    }

    #[test]
    fn username_skips_blank_variables() {
        let name = detect_username(|var| match var {
            "USER" => Some(String::new()),
            "USERNAME" => Some("ada".into()),
            _ => None,
        });
        assert_eq!(name, "ada");
        assert_eq!(detect_username(|_| None), "there");
    }
}
