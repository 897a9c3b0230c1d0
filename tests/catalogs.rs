//! Advisories on disk checked against filesystem catalogs

mod helper;

use tempfile::TempDir;

use glsa_check::advisory::evaluator::Evaluator;
use glsa_check::advisory::repository::AdvisoryRepository;
use glsa_check::version::catalog::Catalog;
use glsa_check::version::catalogs::{RepoCatalog, VdbCatalog};
use glsa_check::version::resolver::UpgradeStrategy;

use helper::{write_advisory, write_repo_entry, write_vdb_entry};

const OPENSSL: &str = r#"
    <package name="dev-libs/openssl" auto="yes" arch="*">
      <unaffected range="ge" slot="0">3.0.13</unaffected>
      <unaffected range="rge">1.1.1w-r1</unaffected>
      <vulnerable range="lt" slot="0">3.0.13</vulnerable>
    </package>"#;

struct Host {
    _temp: TempDir,
    repository: AdvisoryRepository,
    installed: VdbCatalog,
    available: RepoCatalog,
}

fn host() -> Host {
    let temp = TempDir::new().unwrap();
    let glsa_dir = temp.path().join("glsa");
    let vdb = temp.path().join("vdb");
    let repo = temp.path().join("repo");

    write_advisory(&glsa_dir, "202401-01", "OpenSSL: Multiple vulnerabilities", OPENSSL);
    write_vdb_entry(&vdb, "dev-libs/openssl-3.0.10", Some("0/3"));
    for version in ["3.0.12", "3.0.13", "3.0.13-r1", "3.1.4"] {
        write_repo_entry(&repo, &format!("dev-libs/openssl-{version}"), "0/3");
    }
    write_repo_entry(&repo, "dev-libs/openssl-1.1.1w-r1", "0/1.1");

    Host {
        repository: AdvisoryRepository::new(&glsa_dir, "glsa-", ".xml"),
        installed: VdbCatalog::new(&vdb),
        available: RepoCatalog::new(&repo),
        _temp: temp,
    }
}

#[test]
fn filesystem_catalogs_strip_subslots() {
    let host = host();

    let installed = host.installed.records("dev-libs/openssl").unwrap();
    let available = host.available.records("dev-libs/openssl").unwrap();

    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].slot, "0");
    assert_eq!(available.len(), 5);
    assert!(available.iter().all(|r| r.slot == "0"));
}

#[test]
fn advisory_from_disk_resolves_least_change_upgrade() {
    let host = host();
    let advisory = host.repository.load("202401-01").unwrap();
    let evaluator = Evaluator::new(&host.installed, &host.available, "amd64");

    assert!(evaluator.is_vulnerable(&advisory).unwrap());

    let least: Vec<String> = evaluator
        .merge_list(&advisory, UpgradeStrategy::LeastChange)
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    let latest: Vec<String> = evaluator
        .merge_list(&advisory, UpgradeStrategy::Latest)
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(least, vec!["dev-libs/openssl-3.0.13"]);
    assert_eq!(latest, vec!["dev-libs/openssl-3.1.4"]);
}

#[test]
fn up_to_date_host_is_not_vulnerable() {
    let host = host();
    let vdb = host.installed.root().to_path_buf();
    std::fs::remove_dir_all(vdb.join("dev-libs/openssl-3.0.10")).unwrap();
    write_vdb_entry(&vdb, "dev-libs/openssl-3.0.13", Some("0/3"));

    let advisory = host.repository.load("202401-01").unwrap();
    let evaluator = Evaluator::new(&host.installed, &host.available, "amd64");

    assert!(!evaluator.is_vulnerable(&advisory).unwrap());
}

#[test]
fn missing_category_is_empty_not_an_error() {
    let host = host();

    assert!(host.installed.records("dev-libs/none").unwrap().is_empty());
    assert!(host.available.records("sys-apps/none").unwrap().is_empty());
}
