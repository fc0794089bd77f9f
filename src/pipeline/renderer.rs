use super::config::RenderConfig;
use crate::error::{Degradation, RenderError};
use crate::fonts::FontRegistry;
use crate::language::{LabelKey, LanguagePacks};
use crate::layout::block::{BlockSummary, PageBlock};
use crate::layout::engine::LayoutEngine;
use crate::layout::planner::{self, BatchPlan};
use crate::layout::profile::LanguageProfile;
use crate::model::StatementRequest;
use crate::perf::{OperationMetrics, PerfMonitor};
use crate::render::{self, AssemblyReport, DocumentInfo, StatementFooter};
use chrono::Local;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Cursor, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Arc;

/// The block stream of one statement, before pagination.
#[derive(Debug, Clone)]
pub struct LaidOutStatement {
    pub language: String,
    pub degradations: Vec<Degradation>,
    pub plan: BatchPlan,
    pub blocks: Vec<PageBlock>,
}

impl LaidOutStatement {
    pub fn summary(&self) -> BlockSummary {
        BlockSummary::of(&self.blocks)
    }
}

/// What happened during one render.
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    /// The pack actually used, after any fallback.
    pub language: String,
    pub degradations: Vec<Degradation>,
    pub plan: BatchPlan,
    pub page_count: usize,
    pub blocks: BlockSummary,
    pub byte_len: u64,
    pub metrics: BTreeMap<String, OperationMetrics>,
}

#[derive(Debug, Clone)]
pub struct RenderedStatement {
    pub bytes: Vec<u8>,
    pub report: RenderReport,
}

/// Renders statement requests to PDF. Cheap to share across threads; every
/// render runs sequentially on the calling thread.
pub struct StatementRenderer {
    config: RenderConfig,
    packs: Arc<LanguagePacks>,
    registry: Arc<FontRegistry>,
    monitor: Arc<PerfMonitor>,
}

impl StatementRenderer {
    pub(super) fn new(
        config: RenderConfig,
        packs: Arc<LanguagePacks>,
        registry: Arc<FontRegistry>,
        monitor: Arc<PerfMonitor>,
    ) -> Self {
        Self {
            config,
            packs,
            registry,
            monitor,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn packs(&self) -> &LanguagePacks {
        &self.packs
    }

    pub fn registry(&self) -> &Arc<FontRegistry> {
        &self.registry
    }

    pub fn monitor(&self) -> &Arc<PerfMonitor> {
        &self.monitor
    }

    fn profile(&self, request: &StatementRequest) -> LanguageProfile<'_> {
        let profile = LanguageProfile::resolve(&self.packs, &self.registry, &request.language);
        for degradation in &profile.degradations {
            log::warn!("{}", degradation);
        }
        profile
    }

    fn lay_out(
        &self,
        request: &StatementRequest,
        profile: &LanguageProfile<'_>,
    ) -> Result<LaidOutStatement, RenderError> {
        let _span = self.monitor.span("layout");
        let plan = planner::plan(
            request.transactions.len(),
            self.config.base_batch_size,
            self.config.memory_ceiling_mb,
        );
        log::debug!(
            "Planned {} transaction(s) into {} batch(es) of {}.",
            plan.total,
            plan.batch_count,
            plan.batch_size
        );
        let blocks = LayoutEngine::new(profile, plan)
            .with_monitor(&self.monitor)
            .run(&request.cardholder, &request.statement, &request.transactions)?;
        Ok(LaidOutStatement {
            language: profile.code().to_string(),
            degradations: profile.degradations.clone(),
            plan,
            blocks,
        })
    }

    /// Lays out a statement without producing a document.
    pub fn layout(&self, request: &StatementRequest) -> Result<LaidOutStatement, RenderError> {
        let profile = self.profile(request);
        self.lay_out(request, &profile)
    }

    fn assemble_into<W: Write + Seek>(
        &self,
        request: &StatementRequest,
        sink: W,
    ) -> Result<(W, RenderReport), RenderError> {
        let (sink, laid_out, assembly) = {
            let _span = self.monitor.span("render_total");
            let profile = self.profile(request);
            let laid_out = self.lay_out(request, &profile)?;

            let footer = StatementFooter::new(
                &profile,
                request.statement.statement_date,
                self.config.margin_pt,
            );
            let info = DocumentInfo {
                title: format!("{} - {}", profile.label(LabelKey::Title), request.cardholder.name),
                created: (!self.config.deterministic).then(Local::now),
            };
            let (sink, assembly): (W, AssemblyReport) = render::assemble(
                &laid_out.blocks,
                self.config.geometry(),
                &self.registry,
                &|ctx, canvas| footer.draw(ctx, canvas),
                &info,
                Some(&self.monitor),
                sink,
            )?;
            (sink, laid_out, assembly)
        };

        log::info!(
            "Rendered '{}' statement: {} page(s), {} bytes.",
            laid_out.language,
            assembly.page_count,
            assembly.byte_len
        );
        let report = RenderReport {
            blocks: laid_out.summary(),
            language: laid_out.language,
            degradations: laid_out.degradations,
            plan: laid_out.plan,
            page_count: assembly.page_count,
            byte_len: assembly.byte_len,
            metrics: self.monitor.snapshot(),
        };
        Ok((sink, report))
    }

    /// Renders to an in-memory PDF.
    pub fn render(&self, request: &StatementRequest) -> Result<RenderedStatement, RenderError> {
        let (cursor, report) = self.assemble_into(request, Cursor::new(Vec::new()))?;
        Ok(RenderedStatement {
            bytes: cursor.into_inner(),
            report,
        })
    }

    /// Renders to `path`. The document is assembled in a temporary file next
    /// to the target and renamed into place only once it is complete, so a
    /// failed render leaves nothing at `path`.
    pub fn render_to_path<P: AsRef<Path>>(
        &self,
        request: &StatementRequest,
        path: P,
    ) -> Result<RenderReport, RenderError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| RenderError::assembly("create_output_dir", e))?;

        let temp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| RenderError::assembly("create_temp_file", e))?;
        let (mut temp, report) = self.assemble_into(request, temp).inspect_err(|e| {
            log::warn!("Discarding partial output for '{}': {}", path.display(), e);
        })?;
        temp.flush()
            .map_err(|e| RenderError::assembly("flush_temp_file", e))?;
        temp.persist(path)
            .map_err(|e| RenderError::assembly("publish", e.error))?;
        Ok(report)
    }

    /// Renders into an anonymous temporary file, then copies the finished
    /// document to `writer`. Nothing reaches `writer` if the render fails.
    pub fn render_to_writer<W: Write>(
        &self,
        request: &StatementRequest,
        mut writer: W,
    ) -> Result<RenderReport, RenderError> {
        let temp = tempfile::tempfile().map_err(|e| RenderError::assembly("create_temp_file", e))?;
        let (mut temp, report) = self.assemble_into(request, temp)?;
        temp.seek(SeekFrom::Start(0))
            .map_err(|e| RenderError::assembly("rewind_temp_file", e))?;
        io::copy(&mut temp, &mut writer).map_err(|e| RenderError::assembly("copy_output", e))?;
        writer
            .flush()
            .map_err(|e| RenderError::assembly("copy_output", e))?;
        Ok(report)
    }

    /// Renders every request, in parallel when the `parallel` feature is on.
    /// Results keep the order of `requests`.
    pub fn render_all(
        &self,
        requests: &[StatementRequest],
    ) -> Vec<Result<RenderedStatement, RenderError>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            requests.par_iter().map(|r| self.render(r)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            requests.iter().map(|r| self.render(r)).collect()
        }
    }
}
