use std::path::{Path, PathBuf};
use std::sync::Arc;

use tenet_core::allowlist::AllowList;
use tenet_core::config::TenetConfig;
use tenet_core::model::{ModelSet, ModelType, SchemaManifest};
use tenet_core::registry::{Registry, Snapshot};
use tenet_core::types::MethodDefinition;
use tenet_parsers::{FileSet, SourceScanner};

use crate::intercept::{Interceptor, Tracked};
use crate::relationships::RelationshipValidator;
use crate::types::{
    ActionsResult, AssociationsResult, DefsResult, EnforceError, TrackingReport, UpgradeResult,
    VerifyResult,
};
use crate::{actions, defs, tracking, upgrade};

/// Runs the conformance checks for one workspace.
///
/// Every pass reads its inputs fresh from disk; nothing is cached between
/// calls. Models are declared through the tracking decorator, so the registry
/// holds a key for every generated scope and delegation in the schema.
pub struct VerificationEngine {
    root: PathBuf,
    config: TenetConfig,
    registry: Arc<Registry>,
    scanner: SourceScanner,
}

impl VerificationEngine {
    pub fn new(root: &Path, config: TenetConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            registry: Arc::new(Registry::new()),
            scanner: SourceScanner::new(),
        }
    }

    /// Share an existing registry, e.g. [`Registry::global`].
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &TenetConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Load the schema manifest and declare every model through the tracking
    /// layer.
    pub fn load_models(&self) -> Result<ModelSet, EnforceError> {
        let manifest = SchemaManifest::load(&self.config.schema_path(&self.root))?;
        let interceptor = Interceptor::new(Arc::clone(&self.registry));

        let mut models = ModelSet::new();
        if let Some(version) = &manifest.framework_version {
            models = models.with_framework_version(version);
        }
        for model in &manifest.models {
            let mut tracked = Tracked::new(ModelType::new(&model.name), interceptor.clone());
            model.declare(&mut tracked)?;
            models.insert(tracked.into_inner());
        }
        tracing::debug!(
            models = models.len(),
            tracked = self.registry.len(),
            "schema declared"
        );
        Ok(models)
    }

    fn scan(&self, patterns: &[String]) -> Result<(usize, Vec<MethodDefinition>), EnforceError> {
        let files = FileSet::resolve(&self.root, patterns, &self.config.ignore_patterns)?;
        let mut definitions = self.scanner.scan(files.files())?;
        for def in &mut definitions {
            def.location.file = self.relative(&def.location.file);
        }
        Ok((files.len(), definitions))
    }

    fn relative(&self, file: &str) -> String {
        Path::new(file)
            .strip_prefix(&self.root)
            .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            .unwrap_or_else(|_| file.to_string())
    }

    pub fn defs(&self) -> Result<DefsResult, EnforceError> {
        let (files, definitions) = self.scan(&self.config.models)?;
        let allow_list = AllowList::load(&self.config.allow_list_path(&self.root))?;
        Ok(defs::check_defs(&definitions, &allow_list, files))
    }

    pub fn associations(&self) -> Result<AssociationsResult, EnforceError> {
        let models = self.load_models()?;
        Ok(RelationshipValidator::new(&models).validate())
    }

    pub fn actions(&self) -> Result<ActionsResult, EnforceError> {
        let (files, definitions) = self.scan(&self.config.controllers)?;
        Ok(actions::check_actions(&definitions, &self.config.actions.allowed, files))
    }

    /// The configured current version wins over the one recorded in the
    /// schema manifest. The manifest is only read when it is needed.
    pub fn upgrade(&self) -> Result<UpgradeResult, EnforceError> {
        self.upgrade_with(None)
    }

    fn upgrade_with(&self, models: Option<&ModelSet>) -> Result<UpgradeResult, EnforceError> {
        let cfg = &self.config.upgrade;
        let current = match (&cfg.current_version, models) {
            (Some(version), _) => Some(version.clone()),
            (None, Some(models)) => models.framework_version().map(str::to_string),
            (None, None) if cfg.last_tested_version.is_some() => {
                SchemaManifest::load(&self.config.schema_path(&self.root))?.framework_version
            }
            (None, None) => None,
        };
        upgrade::check_upgrade(
            cfg.last_tested_version.as_deref(),
            current.as_deref(),
            &cfg.pinned,
        )
    }

    /// Every check enabled in the configuration, in a fixed order. The first
    /// wiring error aborts the pass.
    pub fn verify(&self) -> Result<VerifyResult, EnforceError> {
        let checks = &self.config.checks;
        let upgrade_cfg = &self.config.upgrade;
        let needs_models = checks.associations
            || (checks.upgrade
                && upgrade_cfg.current_version.is_none()
                && upgrade_cfg.last_tested_version.is_some());
        let models = if needs_models { Some(self.load_models()?) } else { None };

        let defs = if checks.defs { Some(self.defs()?) } else { None };
        let associations = match (&models, checks.associations) {
            (Some(models), true) => Some(RelationshipValidator::new(models).validate()),
            _ => None,
        };
        let actions = if checks.actions { Some(self.actions()?) } else { None };
        let upgrade = if checks.upgrade {
            Some(self.upgrade_with(models.as_ref())?)
        } else {
            None
        };

        let result = VerifyResult::new(defs, associations, actions, upgrade);
        tracing::info!(
            status = %result.status,
            violations = result.violations().count(),
            "verification complete"
        );
        Ok(result)
    }

    /// Declare the schema and report which generated methods have no recorded
    /// invocations, adding counts exported by the application if given.
    pub fn macros(&self, observed: Option<&Snapshot>) -> Result<TrackingReport, EnforceError> {
        self.load_models()?;
        Ok(match observed {
            Some(counts) => tracking::report_with(&self.registry, counts),
            None => tracking::report(&self.registry),
        })
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
