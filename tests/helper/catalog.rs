//! Catalog test utilities

use std::path::Path;

use glsa_check::version::catalog::PackageVersionRecord;
use glsa_check::version::catalogs::MemoryCatalog;

/// Build an in-memory catalog from `(cpv, slot)` pairs such as
/// `("cat/pkg-1.0", "0")`
pub fn memory_catalog(records: &[(&str, &str)]) -> MemoryCatalog {
    MemoryCatalog::from_records(records.iter().map(|(cpv, slot)| {
        let (package, version) = glsa_check::version::atom::split_package_version(cpv)
            .unwrap_or_else(|| panic!("not a package-version: {cpv}"));
        PackageVersionRecord::new(package, version, *slot)
    }))
    .unwrap()
}

/// Create `<vdb>/<cat>/<pn>-<ver>/SLOT`
pub fn write_vdb_entry(vdb: &Path, cpv: &str, slot: Option<&str>) {
    let dir = vdb.join(cpv);
    std::fs::create_dir_all(&dir).unwrap();
    if let Some(slot) = slot {
        std::fs::write(dir.join("SLOT"), format!("{slot}\n")).unwrap();
    }
}

/// Create `<repo>/metadata/md5-cache/<cat>/<pn>-<ver>`
pub fn write_repo_entry(repo: &Path, cpv: &str, slot: &str) {
    let path = repo.join("metadata/md5-cache").join(cpv);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        path,
        format!("DEFINED_PHASES=install\nEAPI=8\nKEYWORDS=amd64 arm64\nSLOT={slot}\n"),
    )
    .unwrap();
}
