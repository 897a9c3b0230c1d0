//! Matching atoms against catalogs

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::debug;

use crate::version::atom::Atom;
use crate::version::catalog::{Catalog, PackageVersionRecord};
use crate::version::error::CatalogError;
use crate::version::pv::{compare_revisions, compare_versions};

/// Check whether a single record satisfies `atom`
pub fn matches(atom: &Atom, record: &PackageVersionRecord) -> bool {
    if record.package != atom.package {
        return false;
    }
    if atom.slot.as_ref().is_some_and(|slot| *slot != record.slot) {
        return false;
    }

    if atom.operator.is_revision_range() {
        // Same version, ignoring revisions; the operator applies to the revision only
        record.version.cmp_base(&atom.version) == Ordering::Equal
            && atom
                .operator
                .accepts(compare_revisions(&record.version, &atom.version))
    } else {
        atom.operator
            .accepts(compare_versions(&record.version, &atom.version))
    }
}

/// Filter `records` down to the ones matching `atom`, without duplicates
pub fn match_records<'a>(
    atom: &Atom,
    records: impl IntoIterator<Item = &'a PackageVersionRecord>,
) -> BTreeSet<PackageVersionRecord> {
    records
        .into_iter()
        .filter(|record| matches(atom, record))
        .cloned()
        .collect()
}

/// All records of `catalog` matching `atom`
pub fn match_atom<C: Catalog + ?Sized>(
    atom: &Atom,
    catalog: &C,
) -> Result<BTreeSet<PackageVersionRecord>, CatalogError> {
    let records = catalog.records(&atom.package)?;
    let matched = match_records(atom, &records);
    debug!(
        "{} matched {} of {} records",
        atom,
        matched.len(),
        records.len()
    );
    Ok(matched)
}

/// Union of the matches of every atom in `atoms`
pub fn match_any<C: Catalog + ?Sized>(
    atoms: &[Atom],
    catalog: &C,
) -> Result<BTreeSet<PackageVersionRecord>, CatalogError> {
    let mut matched = BTreeSet::new();
    for atom in atoms {
        matched.extend(match_atom(atom, catalog)?);
    }
    Ok(matched)
}
