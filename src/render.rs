//! Plugin configuration file rendering.
//!
//! Renders INI sections to text and writes them only when the content
//! differs from what is on disk. Callers collect the changed paths and
//! apply the profile's restart map to them; unchanged files cause no
//! service churn, which keeps hook re-invocation idempotent.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;

/// Ordered sections, each an ordered list of key/value entries.
pub type IniSections = Vec<(String, Vec<(String, String)>)>;

/// Render sections as INI text.
///
/// Section and key order is preserved. A section with no entries renders as
/// a bare header, which is valid INI and keeps the file present for tools
/// that expect it.
pub fn render_ini(sections: &IniSections) -> String {
    let mut out = String::new();
    for (name, entries) in sections {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("[");
        out.push_str(name);
        out.push_str("]\n");
        for (key, value) in entries {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(value);
            out.push('\n');
        }
    }
    out
}

/// Writes managed config files under a target root.
///
/// Targets the real filesystem root in production; tests point it at a
/// temporary directory.
pub struct ConfigWriter {
    root: PathBuf,
    dry_run: bool,
}

impl ConfigWriter {
    pub fn new<P: Into<PathBuf>>(root: P, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            dry_run,
        }
    }

    /// Write `content` to `path` if it differs from the current file.
    ///
    /// Returns true when the file changed (or would change under dry-run).
    /// Missing parent directories are created.
    pub fn write_if_changed(&self, path: &str, content: &str) -> Result<bool> {
        let target = self.rooted(path);
        let current = fs::read_to_string(&target).ok();
        if current.as_deref() == Some(content) {
            debug!("{} is up to date", target.display());
            return Ok(false);
        }

        if self.dry_run {
            info!("dry-run: would write {}", target.display());
            return Ok(true);
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content)?;
        info!("Wrote {}", target.display());
        Ok(true)
    }

    /// Resolve an absolute config path under the writer root.
    fn rooted(&self, path: &str) -> PathBuf {
        self.root.join(Path::new(path.trim_start_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> IniSections {
        vec![(
            "ml2".to_string(),
            vec![
                ("mechanism_drivers".to_string(), "arista".to_string()),
                ("tenant_network_types".to_string(), "vlan".to_string()),
            ],
        )]
    }

    #[test]
    fn test_render_ini_basic() {
        let text = render_ini(&sections());
        assert_eq!(
            text,
            "[ml2]\nmechanism_drivers = arista\ntenant_network_types = vlan\n"
        );
    }

    #[test]
    fn test_render_ini_empty_section() {
        let sections: IniSections = vec![("ml2_arista".to_string(), Vec::new())];
        assert_eq!(render_ini(&sections), "[ml2_arista]\n");
    }

    #[test]
    fn test_render_ini_multiple_sections_blank_separated() {
        let sections: IniSections = vec![
            ("a".to_string(), vec![("k".to_string(), "v".to_string())]),
            ("b".to_string(), Vec::new()),
        ];
        assert_eq!(render_ini(&sections), "[a]\nk = v\n\n[b]\n");
    }

    #[test]
    fn test_write_if_changed_creates_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ConfigWriter::new(dir.path(), false);
        let content = render_ini(&sections());

        // First write creates the file and parent directories
        assert!(
            writer
                .write_if_changed("/etc/neutron/plugins/ml2/ml2_conf.ini", &content)
                .unwrap()
        );
        let on_disk = dir.path().join("etc/neutron/plugins/ml2/ml2_conf.ini");
        assert_eq!(fs::read_to_string(&on_disk).unwrap(), content);

        // Identical content is a no-op
        assert!(
            !writer
                .write_if_changed("/etc/neutron/plugins/ml2/ml2_conf.ini", &content)
                .unwrap()
        );

        // Changed content rewrites
        assert!(
            writer
                .write_if_changed("/etc/neutron/plugins/ml2/ml2_conf.ini", "[ml2]\n")
                .unwrap()
        );
        assert_eq!(fs::read_to_string(&on_disk).unwrap(), "[ml2]\n");
    }

    #[test]
    fn test_dry_run_reports_change_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ConfigWriter::new(dir.path(), true);

        assert!(
            writer
                .write_if_changed("/etc/neutron/plugins/ml2/ml2_conf.ini", "[ml2]\n")
                .unwrap()
        );
        assert!(!dir.path().join("etc/neutron/plugins/ml2/ml2_conf.ini").exists());
    }
}
