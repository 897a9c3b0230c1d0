use tracing::{error, info};

use crate::advisory::evaluator::Evaluator;
use crate::advisory::repository::AdvisoryRepository;
use crate::applied::AppliedStore;
use crate::config::GlsaConfig;
use crate::version::catalog::Catalog;
use crate::version::catalogs::{MemoryCatalog, RepoCatalog, VdbCatalog};
use crate::version::error::CatalogError;

/// Everything one command run needs
pub struct Context {
    pub repository: AdvisoryRepository,
    pub applied: AppliedStore,
    pub print_width: usize,
    installed: Box<dyn Catalog>,
    available: Box<dyn Catalog>,
    arch: String,
}

impl Context {
    pub fn new(
        config: &GlsaConfig,
        installed: Box<dyn Catalog>,
        available: Box<dyn Catalog>,
    ) -> Self {
        Self {
            repository: AdvisoryRepository::new(
                &config.glsa_dir,
                &config.glsa_prefix,
                &config.glsa_suffix,
            ),
            applied: AppliedStore::new(&config.checkfile),
            print_width: config.print_width,
            installed,
            available,
            arch: config.arch(),
        }
    }

    /// Build the catalogs named by `config`
    pub fn from_config(config: &GlsaConfig) -> Result<Self, CatalogError> {
        let installed: Box<dyn Catalog> = match &config.installed_catalog {
            Some(path) => Box::new(MemoryCatalog::load(path)?),
            None => Box::new(VdbCatalog::new(&config.vdb_dir)),
        };
        let available: Box<dyn Catalog> = match &config.available_catalog {
            Some(path) => Box::new(MemoryCatalog::load(path)?),
            None => Box::new(RepoCatalog::new(&config.repo_dir)),
        };
        info!(
            "Checking {:?} for arch {}",
            config.glsa_dir,
            config.arch()
        );
        Ok(Self::new(config, installed, available))
    }

    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(self.installed.as_ref(), self.available.as_ref(), &self.arch)
    }

    /// Expand `all`, `new` and `affected` into advisory IDs; other targets
    /// (IDs and file paths) are kept. Repeats are dropped.
    pub fn expand_targets(&self, targets: &[String]) -> Vec<String> {
        let mut expanded: Vec<String> = Vec::new();
        for target in targets {
            let ids = match target.as_str() {
                "all" => self.repository.list_ids(),
                "new" => self.new_ids(),
                "affected" => self.affected_ids(),
                _ => vec![target.clone()],
            };
            for id in ids {
                if !expanded.contains(&id) {
                    expanded.push(id);
                }
            }
        }
        expanded
    }

    fn new_ids(&self) -> Vec<String> {
        let applied = match self.applied.ids() {
            Ok(applied) => applied,
            Err(e) => {
                error!("{}", e);
                Vec::new()
            }
        };
        self.repository
            .list_ids()
            .into_iter()
            .filter(|id| !applied.contains(id))
            .collect()
    }

    fn affected_ids(&self) -> Vec<String> {
        let evaluator = self.evaluator();
        self.repository
            .list_ids()
            .into_iter()
            .filter(|id| {
                let vulnerable = self
                    .repository
                    .load(id)
                    .map_err(anyhow::Error::from)
                    .and_then(|advisory| Ok(evaluator.is_vulnerable(&advisory)?));
                match vulnerable {
                    Ok(vulnerable) => vulnerable,
                    Err(e) => {
                        error!("Failed to check {}: {}", id, e);
                        false
                    }
                }
            })
            .collect()
    }
}
