use crate::application::dto::{ScanRequest, ScanResponse};
use crate::application::read_models::BomReadModelBuilder;
use crate::ports::inbound::ScanPort;
use crate::ports::outbound::{LicenseRegistry, ProgressReporter};
use crate::scanning::domain::{ComponentKind, Ecosystem};
use crate::scanning::{AnalysisContext, Analyzer, Orchestrator};
use crate::shared::Result;
use async_trait::async_trait;
use futures::future::join_all;
use petgraph::graph::NodeIndex;
use std::time::Duration;

/// Rate limiting: delay between registry lookup batches to stay polite
/// towards the package registries (milliseconds)
const ENRICHMENT_BATCH_DELAY_MS: u64 = 100;

/// Number of registry lookups issued concurrently per batch
const ENRICHMENT_BATCH_SIZE: usize = 8;

/// RunScanUseCase - Core use case for dependency scanning
///
/// This use case walks the project tree through the orchestrator,
/// optionally enriches unresolved licenses from package registries, and
/// builds the read model handed to the formatters.
///
/// # Type Parameters
/// * `LR` - LicenseRegistry implementation used for optional enrichment
/// * `PR` - ProgressReporter implementation
pub struct RunScanUseCase<LR, PR> {
    orchestrator: Orchestrator,
    license_registry: Option<LR>,
    progress_reporter: PR,
}

impl<LR, PR> RunScanUseCase<LR, PR>
where
    LR: LicenseRegistry,
    PR: ProgressReporter,
{
    /// Creates a new RunScanUseCase with injected dependencies
    ///
    /// # Arguments
    /// * `analyzers` - The analyzer set to dispatch manifests to
    /// * `license_registry` - Registry client for `--online` enrichment,
    ///   or `None` when enrichment is not wired up
    /// * `progress_reporter` - Reporter for user-facing progress output
    pub fn new(
        analyzers: Vec<Box<dyn Analyzer>>,
        license_registry: Option<LR>,
        progress_reporter: PR,
    ) -> Self {
        Self {
            orchestrator: Orchestrator::new(analyzers),
            license_registry,
            progress_reporter,
        }
    }

    /// Registers every analyzer's options into the registry
    ///
    /// The CLI and config binding need the full key set before settings can
    /// be built, so this runs ahead of `execute`.
    pub fn register_options(&self, registry: &mut crate::scanning::OptionRegistry) {
        self.orchestrator.register_options(registry);
    }

    /// Executes the scan use case
    ///
    /// # Arguments
    /// * `request` - Scan request containing bound settings and options
    ///
    /// # Returns
    /// ScanResponse containing the read model and diagnostic counts
    pub async fn execute(&mut self, request: ScanRequest) -> Result<ScanResponse> {
        self.progress_reporter.report(&format!(
            "🔍 Scanning {} for dependency manifests...",
            request.settings.root().display()
        ));

        let mut context = self.orchestrator.run(request.settings);

        self.progress_reporter.report(&format!(
            "✅ Analyzed {} manifest(s): {} component(s), {} dependency edge(s)",
            context.graph.roots().len(),
            context.graph.node_count(),
            context.graph.edge_count()
        ));

        if request.online {
            self.enrich_unresolved_licenses(&mut context).await;
        }

        let read_model = BomReadModelBuilder::build(&context.graph, &context.diagnostics);
        Ok(ScanResponse::new(
            read_model,
            context.diagnostics.error_count(),
            context.diagnostics.warning_count(),
        ))
    }

    /// Fills in licenses the local metadata could not resolve
    ///
    /// Only library components whose record is still unresolved are looked
    /// up. Lookups run in small concurrent batches with a delay between
    /// batches; failures become warnings, never fatal errors.
    async fn enrich_unresolved_licenses(&self, context: &mut AnalysisContext) {
        let Some(registry) = &self.license_registry else {
            return;
        };

        let pending: Vec<(NodeIndex, Ecosystem, String, String)> = context
            .graph
            .components()
            .filter(|(_, component)| {
                component.kind() == ComponentKind::Library
                    && !component
                        .license()
                        .is_some_and(|record| record.is_resolved())
            })
            .map(|(node, component)| {
                (
                    node,
                    component.ecosystem(),
                    component.name().to_string(),
                    component.version().as_str().to_string(),
                )
            })
            .collect();

        if pending.is_empty() {
            return;
        }

        let total = pending.len();
        self.progress_reporter.report(&format!(
            "🔍 Fetching license information for {} package(s)...",
            total
        ));

        let mut resolved = 0usize;
        let mut completed = 0usize;
        for batch in pending.chunks(ENRICHMENT_BATCH_SIZE) {
            let lookups = batch.iter().map(|(_, ecosystem, name, version)| {
                registry.resolve_license(*ecosystem, name, version)
            });
            let outcomes = join_all(lookups).await;

            for ((node, _, name, version), outcome) in batch.iter().zip(outcomes) {
                completed += 1;
                self.progress_reporter
                    .report_progress(completed, total, Some(name));
                match outcome {
                    Ok(record) if record.is_resolved() => {
                        context.graph.set_license(*node, record);
                        resolved += 1;
                    }
                    // The registry had nothing better; the local record stays
                    Ok(_) => {}
                    Err(e) => {
                        context.diagnostics.warn(format!(
                            "License lookup for {} {} failed: {}",
                            name, version, e
                        ));
                    }
                }
            }

            if completed < total {
                tokio::time::sleep(Duration::from_millis(ENRICHMENT_BATCH_DELAY_MS)).await;
            }
        }

        self.progress_reporter.report_completion(&format!(
            "✅ License enrichment complete: {} of {} package(s) resolved",
            resolved, total
        ));
    }
}

#[async_trait(?Send)]
impl<LR, PR> ScanPort for RunScanUseCase<LR, PR>
where
    LR: LicenseRegistry,
    PR: ProgressReporter,
{
    async fn execute_scan(&mut self, request: ScanRequest) -> Result<ScanResponse> {
        self.execute(request).await
    }
}
