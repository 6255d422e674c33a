use std::path::PathBuf;

/// Returns the directory holding the configuration file: the executable's
/// directory, or the crate root when running from `target/debug|release`
pub fn get_config_dir() -> PathBuf {
    let mut path = std::env::current_exe()
        .unwrap_or_default()
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."))
        .to_path_buf();

    if path.ends_with("target/debug") || path.ends_with("target/release") {
        path.pop();
        path.pop();
    }
    path
}

/// Returns the path to the application configuration file
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("archaeomap.ini")
}

/// Escapes text for use inside HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encodes a query value the way a browser's `encodeURIComponent` does
pub fn encode_uri_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Opens a URL in the system's default browser
pub fn open_in_browser(url: &str) -> std::io::Result<()> {
    use std::process::Command;

    #[cfg(target_os = "windows")]
    let result = Command::new("cmd").args(["/C", "start", "", url]).spawn();

    #[cfg(target_os = "macos")]
    let result = Command::new("open").arg(url).spawn();

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let result = Command::new("xdg-open").arg(url).spawn();

    result.map(|_| ())
}

/// Only http(s) links are rendered as clickable
pub fn is_web_link(link: &str) -> bool {
    let lower = link.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
