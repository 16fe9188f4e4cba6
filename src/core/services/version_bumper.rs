use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};

use crate::core::errors::{DeployError, Result};

static VERSION_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""version"\s*:\s*"([^"]*)""#).expect("valid version field regex")
});

/// Which component of the version to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpLevel {
    Major,
    Minor,
    Patch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VersionBump {
    pub previous: Version,
    pub next: Version,
}

/// Bumps the `"version"` string of a JSON manifest in place.
pub struct VersionBumper {
    pub path: PathBuf,
}

impl VersionBumper {
    /// Compute the next version without touching the file.
    pub fn preview(&self, level: BumpLevel) -> Result<VersionBump> {
        let content = self.read()?;
        bump_content(&content, level)
            .map(|(_, bump)| bump)
            .map_err(|detail| self.invalid(detail))
    }

    /// Rewrite the file with the bumped version. Only the version field
    /// changes; the rest of the file is kept byte for byte.
    pub fn bump(&self, level: BumpLevel) -> Result<VersionBump> {
        let content = self.read()?;
        let (updated, bump) = bump_content(&content, level).map_err(|d| self.invalid(d))?;
        write_atomically(&self.path, &updated)?;
        Ok(bump)
    }

    fn read(&self) -> Result<String> {
        if !self.path.exists() {
            return Err(self.invalid("file not found".into()));
        }
        Ok(std::fs::read_to_string(&self.path)?)
    }

    fn invalid(&self, detail: String) -> DeployError {
        DeployError::InvalidVersion {
            path: self.path.clone(),
            detail,
        }
    }
}

fn bump_content(
    content: &str,
    level: BumpLevel,
) -> std::result::Result<(String, VersionBump), String> {
    let captures = VERSION_FIELD_RE
        .captures(content)
        .ok_or_else(|| "no \"version\" field".to_string())?;
    let field = captures.get(1).ok_or_else(|| "empty version field".to_string())?;

    let previous = Version::parse(field.as_str())
        .map_err(|e| format!("'{}' is not a semantic version: {e}", field.as_str()))?;
    let next = next_version(&previous, level);

    let mut updated = String::with_capacity(content.len());
    updated.push_str(&content[..field.start()]);
    updated.push_str(&next.to_string());
    updated.push_str(&content[field.end()..]);

    Ok((updated, VersionBump { previous, next }))
}

fn next_version(current: &Version, level: BumpLevel) -> Version {
    let mut next = current.clone();
    match level {
        BumpLevel::Major => {
            next.major += 1;
            next.minor = 0;
            next.patch = 0;
        }
        BumpLevel::Minor => {
            next.minor += 1;
            next.patch = 0;
        }
        BumpLevel::Patch => next.patch += 1,
    }
    next.pre = Prerelease::EMPTY;
    next.build = BuildMetadata::EMPTY;
    next
}

fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    // Temp files are created 0600; keep the manifest's own mode
    std::fs::set_permissions(tmp.path(), std::fs::metadata(path)?.permissions())?;
    tmp.persist(path).map_err(|e| DeployError::Io(e.error))?;
    Ok(())
}
