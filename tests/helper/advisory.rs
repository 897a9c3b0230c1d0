//! Advisory test utilities

use std::path::{Path, PathBuf};

use glsa_check::advisory::types::{AffectedPackageEntry, ArchFilter};
use glsa_check::version::atom::Atom;

pub fn entry(
    package: &str,
    arch: &str,
    vulnerable: &[&str],
    unaffected: &[&str],
) -> AffectedPackageEntry {
    let atoms = |atoms: &[&str]| -> Vec<Atom> { atoms.iter().map(|a| a.parse().unwrap()).collect() };
    AffectedPackageEntry::new(
        package,
        ArchFilter::parse(arch),
        true,
        atoms(vulnerable),
        atoms(unaffected),
    )
    .unwrap()
}

/// A minimal advisory document. `packages` holds the inner XML of
/// `<affected>`.
pub fn advisory_xml(id: &str, title: &str, packages: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE glsa SYSTEM "http://www.gentoo.org/dtd/glsa-2.dtd">
<glsa id="{id}">
  <title>{title}</title>
  <synopsis>{title}</synopsis>
  <product type="ebuild">{title}</product>
  <announced>2024-01-01</announced>
  <revised count="1">2024-01-01</revised>
  <bug>1000</bug>
  <access>remote</access>
  <affected>
{packages}
  </affected>
  <background><p>Background.</p></background>
  <description><p>Description.</p></description>
  <impact type="high"><p>Impact.</p></impact>
  <workaround><p>There is no known workaround at this time.</p></workaround>
  <resolution><p>Upgrade.</p></resolution>
</glsa>
"#
    )
}

pub fn write_advisory(dir: &Path, id: &str, title: &str, packages: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(format!("glsa-{id}.xml"));
    std::fs::write(&path, advisory_xml(id, title, packages)).unwrap();
    path
}
