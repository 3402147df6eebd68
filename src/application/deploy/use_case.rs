//! Deploy Orchestrator
//!
//! Drives the two deploy flows:
//! 1. Single file: apply every rule matching a saved file
//! 2. Workspace: enumerate and deploy the files of every rule covering the
//!    workspace, with optional target purge, progress and cancellation
//!
//! Rules are fetched from the rule source at the start of each operation.
//! Operations are serialized behind a mutex owned by the orchestrator.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use tracing::{debug, error, info, warn};

use crate::domain::entities::{
    DeployOperation, DeployScope, OperationState, ResolvedRule, TargetRoot,
};
use crate::domain::ports::{
    DeployEvent, DeployEventSink, FileEnumerator, RuleSource, Transport, TransportError,
};
use crate::domain::services::{
    destination_for_file, is_inside_any, local_target_roots, normalize_path, path_starts_with,
    resolve_rules, rules_for_file, rules_for_workspace, strip_path_prefix,
};
use crate::domain::value_objects::CancellationToken;
use crate::error::{DeployError, FsDeployResult};
use crate::infrastructure::transport::{transport_for, SessionConnector};

use super::result::{DeploySummary, FileFailure, RuleReport};
use super::task::DeployTask;

/// Deploy orchestrator - owns the collaborators of every deploy
pub struct DeployOrchestrator {
    workspace_root: PathBuf,
    rule_source: Box<dyn RuleSource>,
    enumerator: Box<dyn FileEnumerator>,
    connector: Arc<dyn SessionConnector>,
    running: Mutex<()>,
}

/// Mutable state of one operation
struct Run<'a> {
    op: DeployOperation,
    summary: DeploySummary,
    sink: &'a dyn DeployEventSink,
}

impl<'a> Run<'a> {
    fn new(scope: DeployScope, token: CancellationToken, sink: &'a dyn DeployEventSink) -> Self {
        Self {
            summary: DeploySummary::new(scope.clone()),
            op: DeployOperation::new(scope, token),
            sink,
        }
    }

    fn enter(&mut self, state: OperationState) {
        self.op.transition(state);
        self.sink.on_event(DeployEvent::StateChanged { state });
    }

    fn emit_detail(&self, event: DeployEvent) {
        if self.sink.wants_detailed_events() {
            self.sink.on_event(event);
        }
    }

    fn completed(&mut self, report: &mut RuleReport, source: &Path, destination_event: DeployEvent) {
        self.op.record_completed();
        report.files_completed += 1;
        debug!(source = %source.display(), "deployed");
        self.emit_detail(destination_event);
    }

    fn failed(&mut self, report: &mut RuleReport, source: &Path, reason: String) {
        self.op.record_failed();
        report.files_failed += 1;
        warn!(source = %source.display(), rule = report.index, "deploy failed: {}", reason);
        self.emit_detail(DeployEvent::FileFailed {
            source: source.to_path_buf(),
            error: reason.clone(),
        });
        self.summary.failures.push(FileFailure {
            path: source.to_path_buf(),
            rule: report.index,
            reason,
        });
    }

    /// Close the operation in `state` and hand back the summary.
    fn finish(mut self, state: OperationState) -> DeploySummary {
        self.enter(state);
        let progress = self.op.progress();
        self.summary.record_progress(progress);
        self.summary.state = state;
        self.summary.cancelled = state == OperationState::Cancelled;
        self.sink.on_event(DeployEvent::Completed {
            planned: progress.files_planned,
            completed: progress.files_completed,
            failed: progress.files_failed,
            cancelled: self.summary.cancelled,
        });
        self.summary
    }
}

fn report_for(rule: &ResolvedRule) -> RuleReport {
    RuleReport {
        index: rule.index(),
        source: rule.source().to_path_buf(),
        target: rule.target().to_string(),
        files_planned: 0,
        files_completed: 0,
        files_failed: 0,
        purged: false,
    }
}

/// Why purging `rule`'s target would destroy inputs, if it would.
fn purge_conflict(rule: &ResolvedRule, workspace_root: &Path) -> Option<String> {
    let TargetRoot::Local(target) = rule.target() else {
        return None;
    };
    if path_starts_with(rule.source(), target) {
        Some("target contains the rule source".to_string())
    } else if path_starts_with(workspace_root, target) {
        Some("target contains the workspace".to_string())
    } else {
        None
    }
}

fn read_source(path: &Path) -> Result<Vec<u8>, TransportError> {
    fs::read(path).map_err(|e| TransportError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

impl DeployOrchestrator {
    pub fn new(
        workspace_root: impl AsRef<Path>,
        rule_source: impl RuleSource + 'static,
        enumerator: impl FileEnumerator + 'static,
        connector: Arc<dyn SessionConnector>,
    ) -> Self {
        Self {
            workspace_root: normalize_path(workspace_root.as_ref()),
            rule_source: Box::new(rule_source),
            enumerator: Box::new(enumerator),
            connector,
            running: Mutex::new(()),
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Current rules, resolved against the workspace root
    pub fn resolved_rules(&self) -> FsDeployResult<Vec<ResolvedRule>> {
        let rules = self.rule_source.load_rules()?;
        Ok(resolve_rules(&rules, &self.workspace_root))
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.running
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        normalize_path(&self.workspace_root.join(path))
    }

    /// Deploy one saved file to every rule that matches it.
    ///
    /// A file outside every rule is a no-op, not an error.
    pub fn deploy_file(
        &self,
        path: &Path,
        sink: &dyn DeployEventSink,
    ) -> FsDeployResult<DeploySummary> {
        let _running = self.lock();
        let file = self.absolute(path);
        let mut run = Run::new(
            DeployScope::SingleFile(file.clone()),
            CancellationToken::new(),
            sink,
        );

        run.enter(OperationState::Planning);
        let resolved = match self.resolved_rules() {
            Ok(resolved) => resolved,
            Err(e) => {
                run.finish(OperationState::Failed);
                return Err(e);
            }
        };

        let matched: Vec<ResolvedRule> = rules_for_file(&resolved, &file)
            .into_iter()
            .cloned()
            .collect();
        if matched.is_empty() {
            debug!(file = %file.display(), "no deploy rule matches; skipping");
            return Ok(run.finish(OperationState::Completed));
        }

        run.op.set_matched_rules(matched.clone());
        run.op.plan_files(matched.len());
        run.sink.on_event(DeployEvent::OperationStarted {
            scope: run.op.scope().clone(),
            rules: matched.len(),
        });
        run.enter(OperationState::Running);

        let content = read_source(&file);
        for rule in &matched {
            let mut report = report_for(rule);
            report.files_planned = 1;
            run.sink.on_event(DeployEvent::RuleStarted {
                index: rule.index(),
                source: rule.source().to_path_buf(),
                target: rule.target().to_string(),
            });

            let mut transport = transport_for(rule.target(), &self.connector);
            match &content {
                Ok(bytes) => {
                    self.deploy_one(&mut run, &mut report, transport.as_mut(), rule, &file, bytes)
                }
                Err(e) => run.failed(&mut report, &file, e.to_string()),
            }
            run.summary.rules.push(report);
        }

        let summary = run.finish(OperationState::Completed);
        info!(file = %file.display(), "{}", summary.message());
        Ok(summary)
    }

    /// Deploy every file of every rule covering the workspace.
    ///
    /// Fails with `NoMatchingRule` before touching anything when no rule
    /// covers the workspace. `cancel` is checked between files.
    pub fn deploy_workspace(
        &self,
        cancel: &CancellationToken,
        sink: &dyn DeployEventSink,
    ) -> FsDeployResult<DeploySummary> {
        let _running = self.lock();
        let mut run = Run::new(DeployScope::Workspace, cancel.clone(), sink);

        run.enter(OperationState::Planning);
        let resolved = match self.resolved_rules() {
            Ok(resolved) => resolved,
            Err(e) => {
                run.finish(OperationState::Failed);
                return Err(e);
            }
        };

        let matched: Vec<ResolvedRule> = rules_for_workspace(&resolved, &self.workspace_root)
            .into_iter()
            .cloned()
            .collect();
        if matched.is_empty() {
            error!(
                workspace = %self.workspace_root.display(),
                "couldn't find matching deploy rule for workspace"
            );
            run.finish(OperationState::Failed);
            return Err(DeployError::NoMatchingRule {
                workspace: self.workspace_root.clone(),
            });
        }

        info!(
            workspace = %self.workspace_root.display(),
            rules = matched.len(),
            "starting workspace deploy"
        );
        run.op.set_matched_rules(matched.clone());
        run.sink.on_event(DeployEvent::OperationStarted {
            scope: DeployScope::Workspace,
            rules: matched.len(),
        });
        run.enter(OperationState::Running);

        let share = 100.0 / matched.len() as f64;
        let outputs = local_target_roots(&matched);
        let mut cancelled = false;

        for rule in &matched {
            if run.op.cancellation_requested() {
                cancelled = true;
                break;
            }
            cancelled = self.deploy_rule(&mut run, rule, &outputs, share);
            if cancelled {
                break;
            }
        }

        let state = if cancelled {
            OperationState::Cancelled
        } else {
            OperationState::Completed
        };
        let summary = run.finish(state);
        info!("{}", summary.message());
        Ok(summary)
    }

    /// Run the workspace deploy on a background thread.
    pub fn spawn_workspace(
        self: Arc<Self>,
        sink: Arc<dyn DeployEventSink>,
    ) -> FsDeployResult<DeployTask> {
        let token = CancellationToken::new();
        let cancel = token.clone();
        let handle = thread::Builder::new()
            .name("fsdeploy-workspace".to_string())
            .spawn(move || self.deploy_workspace(&cancel, sink.as_ref()))?;
        Ok(DeployTask::new(token, handle))
    }

    /// Deploy one rule of a workspace deploy. Files under any of `outputs`
    /// are earlier deploy output and never re-deployed. Returns whether
    /// cancellation stopped it.
    fn deploy_rule(
        &self,
        run: &mut Run<'_>,
        rule: &ResolvedRule,
        outputs: &[PathBuf],
        share: f64,
    ) -> bool {
        let mut report = report_for(rule);
        let mut transport = transport_for(rule.target(), &self.connector);
        info!(
            rule = rule.index(),
            source = %rule.source().display(),
            target = %rule.target(),
            transport = transport.name(),
            "deploying rule"
        );
        run.sink.on_event(DeployEvent::RuleStarted {
            index: rule.index(),
            source: rule.source().to_path_buf(),
            target: rule.target().to_string(),
        });

        if rule.rule().delete_target_before_deploy() {
            let target = rule.target().to_string();
            let purged = match purge_conflict(rule, &self.workspace_root) {
                Some(reason) => Err(TransportError::TargetDelete {
                    path: target.clone(),
                    message: format!("refusing to delete: {}", reason),
                }),
                None => transport.purge(&rule.target().destination()),
            };
            match purged {
                Ok(()) => {
                    info!(target = %target, "removed target before deploy");
                    report.purged = true;
                    run.sink.on_event(DeployEvent::TargetPurged { target });
                }
                Err(e) => {
                    warn!(target = %target, "failed to remove target: {}", e);
                    run.sink.on_event(DeployEvent::TargetPurgeFailed {
                        target,
                        error: e.to_string(),
                    });
                }
            }
        }

        let entries = match self
            .enumerator
            .find_files(&self.workspace_root, rule.source(), rule.filter())
        {
            Ok(entries) => entries,
            Err(e) => {
                warn!(rule = rule.index(), "{}", e);
                run.failed(&mut report, &e.root, e.to_string());
                run.summary.rules.push(report);
                return false;
            }
        };

        let mut files = Vec::with_capacity(entries.len());
        for entry in entries {
            if !entry.is_local() {
                run.emit_detail(DeployEvent::FileSkipped {
                    source: entry.path,
                    reason: "not a local file".to_string(),
                });
                continue;
            }
            if is_inside_any(&entry.path, outputs) {
                continue;
            }
            if rules_for_file(std::slice::from_ref(rule), &entry.path).is_empty() {
                continue;
            }
            files.push(entry.path);
        }

        report.files_planned = files.len();
        run.op.plan_files(files.len());
        let increment = if files.is_empty() {
            0.0
        } else {
            share / files.len() as f64
        };

        let mut cancelled = false;
        for file in &files {
            if run.op.cancellation_requested() {
                cancelled = true;
                break;
            }

            match read_source(file) {
                Ok(bytes) => {
                    self.deploy_one(run, &mut report, transport.as_mut(), rule, file, &bytes)
                }
                Err(e) => run.failed(&mut report, file, e.to_string()),
            }

            let progress = run.op.progress();
            let label = strip_path_prefix(file, rule.source()).unwrap_or_else(|| file.clone());
            run.sink.on_event(DeployEvent::Progress {
                completed: progress.processed(),
                planned: progress.files_planned,
                increment_percent: increment,
                message: label.display().to_string(),
            });
        }

        if cancelled {
            info!(
                rule = rule.index(),
                completed = report.files_completed,
                planned = report.files_planned,
                "rule deploy cancelled"
            );
        }
        run.summary.rules.push(report);
        cancelled
    }

    /// Deliver one file's bytes under one rule.
    fn deploy_one(
        &self,
        run: &mut Run<'_>,
        report: &mut RuleReport,
        transport: &mut dyn Transport,
        rule: &ResolvedRule,
        file: &Path,
        bytes: &[u8],
    ) {
        let destination = match destination_for_file(rule, file) {
            Ok(destination) => destination,
            Err(e) => return run.failed(report, file, e.to_string()),
        };

        match transport.deliver(&destination, bytes) {
            Ok(()) => run.completed(
                report,
                file,
                DeployEvent::FileDeployed {
                    source: file.to_path_buf(),
                    destination,
                },
            ),
            Err(e) => run.failed(report, file, e.to_string()),
        }
    }
}
