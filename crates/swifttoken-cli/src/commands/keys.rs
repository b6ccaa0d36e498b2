//! Key management commands.
//!
//! `swifttoken keys generate` - Generate a new 32-byte token key.

use std::fs;
use std::path::{Path, PathBuf};
use swifttoken_token::SecretKey;

/// Generate a new key, printing it or writing it to `output`.
pub fn generate(output: Option<PathBuf>) -> anyhow::Result<()> {
    let key = SecretKey::generate();

    if let Some(output_path) = output {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        write_private(&output_path, &key.to_base64())?;

        println!("✔ Generated token key: {}", output_path.display());
        println!();
        println!("⚠️  Keep this key secret! Anyone holding it can mint tokens.");
        println!();
        println!("Set as environment variable:");
        println!("  export SWIFTTOKEN_SECRET=$(cat {})", output_path.display());
    } else {
        println!("{}", key.to_base64());
    }

    Ok(())
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, contents)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_generate_key_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keys").join("token.key");
        generate(Some(path.clone())).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        // 32 bytes base64-encoded = 44 characters
        assert_eq!(text.len(), 44);
        assert!(SecretKey::parse(&text).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_key_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("token.key");
        generate(Some(path.clone())).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
