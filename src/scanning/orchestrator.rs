use crate::scanning::analyzers::Analyzer;
use crate::scanning::domain::{ComponentGraph, Diagnostics};
use crate::scanning::settings::{AnalysisSettings, OptionRegistry};
use glob::Pattern;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Everything one analysis run accumulates.
///
/// The graph and the diagnostics sink are public fields on purpose: analyzers
/// mutate both in the same pass, which split borrows allow and accessor pairs
/// would not.
#[derive(Debug)]
pub struct AnalysisContext {
    settings: AnalysisSettings,
    pub graph: ComponentGraph,
    pub diagnostics: Diagnostics,
}

impl AnalysisContext {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self {
            settings,
            graph: ComponentGraph::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Read-only run settings, including typed analyzer options.
    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }
}

/// Orchestrator - walks the project tree and dispatches manifests to analyzers
///
/// Owns the analyzer set for one run. Directories are pruned when any enabled
/// analyzer vetoes them via `should_traverse`; files are dispatched to every
/// enabled analyzer whose pattern matches and whose `can_handle` accepts,
/// each as an independent `analyze` invocation. A manifest that records
/// error diagnostics never stops other manifests from being analyzed.
pub struct Orchestrator {
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl Orchestrator {
    pub fn new(analyzers: Vec<Box<dyn Analyzer>>) -> Self {
        Self { analyzers }
    }

    /// Lets every analyzer register its named options. Called once before
    /// settings are bound.
    pub fn register_options(&self, registry: &mut OptionRegistry) {
        for analyzer in &self.analyzers {
            analyzer.initialize(registry);
        }
    }

    /// Runs the full analysis: per-run setup hooks, the tree walk with
    /// dispatch, then teardown hooks. Returns the accumulated context.
    pub fn run(&mut self, settings: AnalysisSettings) -> AnalysisContext {
        let mut context = AnalysisContext::new(settings);

        // All analyzers get the setup hook; it is where they read their
        // disable option, so the enabled() check comes after.
        for analyzer in &mut self.analyzers {
            analyzer.before_analysis(&mut context);
        }

        let manifests = self.collect_manifests(&mut context);
        for (index, manifest) in manifests {
            self.analyzers[index].analyze(&mut context, &manifest);
        }

        for analyzer in &mut self.analyzers {
            if analyzer.enabled() {
                analyzer.after_analysis(&mut context);
            }
        }

        context
    }

    /// Walks the tree rooted at the run's project path and collects
    /// (analyzer index, manifest path) pairs in deterministic order.
    fn collect_manifests(&self, context: &mut AnalysisContext) -> Vec<(usize, PathBuf)> {
        let enabled: Vec<usize> = self
            .analyzers
            .iter()
            .enumerate()
            .filter(|(_, analyzer)| analyzer.enabled())
            .map(|(index, _)| index)
            .collect();

        let patterns: Vec<(usize, Vec<Pattern>)> = enabled
            .iter()
            .map(|&index| {
                let compiled = self.analyzers[index]
                    .patterns()
                    .iter()
                    .filter_map(|raw| Pattern::new(raw).ok())
                    .collect();
                (index, compiled)
            })
            .collect();

        let mut manifests = Vec::new();
        let walker = WalkDir::new(context.settings().root())
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if !entry.file_type().is_dir() {
                    return true;
                }
                if entry.file_name() == ".git" {
                    return false;
                }
                enabled
                    .iter()
                    .all(|&index| self.analyzers[index].should_traverse(entry.path()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    context
                        .diagnostics
                        .warn(format!("Skipped unreadable directory entry: {}", e));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            for (index, compiled) in &patterns {
                if compiled.iter().any(|pattern| pattern.matches(&file_name))
                    && self.analyzers[*index].can_handle(entry.path())
                {
                    manifests.push((*index, entry.path().to_path_buf()));
                }
            }
        }
        manifests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Test analyzer that records every hook invocation.
    struct RecordingAnalyzer {
        enabled: bool,
        pattern: &'static str,
        veto_dir: Option<&'static str>,
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl RecordingAnalyzer {
        fn new(pattern: &'static str, calls: Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                enabled: true,
                pattern,
                veto_dir: None,
                calls,
            }
        }
    }

    impl Analyzer for RecordingAnalyzer {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn patterns(&self) -> &[&'static str] {
            std::slice::from_ref(&self.pattern)
        }

        fn enabled(&self) -> bool {
            self.enabled
        }

        fn before_analysis(&mut self, _context: &mut AnalysisContext) {
            self.calls.borrow_mut().push("before".to_string());
        }

        fn should_traverse(&self, directory: &Path) -> bool {
            match self.veto_dir {
                Some(veto) => directory.file_name().map(|n| n != veto).unwrap_or(true),
                None => true,
            }
        }

        fn analyze(&mut self, _context: &mut AnalysisContext, manifest: &Path) {
            self.calls
                .borrow_mut()
                .push(format!("analyze:{}", manifest.file_name().unwrap().to_string_lossy()));
        }

        fn after_analysis(&mut self, _context: &mut AnalysisContext) {
            self.calls.borrow_mut().push("after".to_string());
        }
    }

    fn settings_for(dir: &TempDir) -> AnalysisSettings {
        AnalysisSettings::new(dir.path().to_path_buf())
    }

    #[test]
    fn test_run_dispatches_matching_files_in_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.mfst"), "").unwrap();
        fs::write(dir.path().join("b.mfst"), "").unwrap();
        fs::write(dir.path().join("ignored.txt"), "").unwrap();

        let calls = Rc::new(RefCell::new(Vec::new()));
        let analyzer = RecordingAnalyzer::new("*.mfst", Rc::clone(&calls));
        let mut orchestrator = Orchestrator::new(vec![Box::new(analyzer)]);
        orchestrator.run(settings_for(&dir));

        assert_eq!(
            *calls.borrow(),
            vec!["before", "analyze:a.mfst", "analyze:b.mfst", "after"]
        );
    }

    #[test]
    fn test_disabled_analyzer_gets_no_manifests_and_no_teardown() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.mfst"), "").unwrap();

        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut analyzer = RecordingAnalyzer::new("*.mfst", Rc::clone(&calls));
        analyzer.enabled = false;
        let mut orchestrator = Orchestrator::new(vec![Box::new(analyzer)]);
        orchestrator.run(settings_for(&dir));

        // The setup hook still runs (that is where disable options are read)
        assert_eq!(*calls.borrow(), vec!["before"]);
    }

    #[test]
    fn test_vetoed_directories_are_not_descended() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("skipme")).unwrap();
        fs::create_dir(dir.path().join("keep")).unwrap();
        fs::write(dir.path().join("skipme/a.mfst"), "").unwrap();
        fs::write(dir.path().join("keep/b.mfst"), "").unwrap();

        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut analyzer = RecordingAnalyzer::new("*.mfst", Rc::clone(&calls));
        analyzer.veto_dir = Some("skipme");
        let mut orchestrator = Orchestrator::new(vec![Box::new(analyzer)]);
        orchestrator.run(settings_for(&dir));

        assert_eq!(
            *calls.borrow(),
            vec!["before", "analyze:b.mfst", "after"]
        );
    }

    #[test]
    fn test_git_internals_are_always_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/config.mfst"), "").unwrap();

        let calls = Rc::new(RefCell::new(Vec::new()));
        let analyzer = RecordingAnalyzer::new("*.mfst", Rc::clone(&calls));
        let mut orchestrator = Orchestrator::new(vec![Box::new(analyzer)]);
        orchestrator.run(settings_for(&dir));

        assert_eq!(*calls.borrow(), vec!["before", "after"]);
    }

    #[test]
    fn test_shared_pattern_dispatches_to_every_claiming_analyzer() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.mfst"), "").unwrap();

        let first_calls = Rc::new(RefCell::new(Vec::new()));
        let second_calls = Rc::new(RefCell::new(Vec::new()));
        let first = RecordingAnalyzer::new("*.mfst", Rc::clone(&first_calls));
        let second = RecordingAnalyzer::new("*.mfst", Rc::clone(&second_calls));
        let mut orchestrator = Orchestrator::new(vec![Box::new(first), Box::new(second)]);
        orchestrator.run(settings_for(&dir));

        // Both claim the file, so each gets its own analyze call.
        assert!(first_calls.borrow().contains(&"analyze:a.mfst".to_string()));
        assert!(second_calls.borrow().contains(&"analyze:a.mfst".to_string()));
    }

    #[test]
    fn test_declining_analyzer_does_not_block_others() {
        struct DecliningAnalyzer {
            calls: Rc<RefCell<Vec<String>>>,
        }

        impl Analyzer for DecliningAnalyzer {
            fn name(&self) -> &'static str {
                "declining"
            }
            fn patterns(&self) -> &[&'static str] {
                &["*.mfst"]
            }
            fn enabled(&self) -> bool {
                true
            }
            fn can_handle(&self, _path: &Path) -> bool {
                false
            }
            fn analyze(&mut self, _context: &mut AnalysisContext, manifest: &Path) {
                self.calls
                    .borrow_mut()
                    .push(manifest.file_name().unwrap().to_string_lossy().to_string());
            }
        }

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.mfst"), "").unwrap();

        let declined = Rc::new(RefCell::new(Vec::new()));
        let accepted = Rc::new(RefCell::new(Vec::new()));
        let first = DecliningAnalyzer {
            calls: Rc::clone(&declined),
        };
        let second = RecordingAnalyzer::new("*.mfst", Rc::clone(&accepted));
        let mut orchestrator = Orchestrator::new(vec![Box::new(first), Box::new(second)]);
        orchestrator.run(settings_for(&dir));

        assert!(declined.borrow().is_empty());
        assert!(accepted.borrow().contains(&"analyze:a.mfst".to_string()));
    }

    #[test]
    fn test_error_in_one_manifest_does_not_stop_dispatch() {
        struct FailingAnalyzer {
            calls: Rc<RefCell<Vec<String>>>,
        }

        impl Analyzer for FailingAnalyzer {
            fn name(&self) -> &'static str {
                "failing"
            }
            fn patterns(&self) -> &[&'static str] {
                &["*.mfst"]
            }
            fn enabled(&self) -> bool {
                true
            }
            fn analyze(&mut self, context: &mut AnalysisContext, manifest: &Path) {
                context.diagnostics.error_at(manifest, "boom");
                self.calls
                    .borrow_mut()
                    .push(manifest.file_name().unwrap().to_string_lossy().to_string());
            }
        }

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.mfst"), "").unwrap();
        fs::write(dir.path().join("b.mfst"), "").unwrap();

        let calls = Rc::new(RefCell::new(Vec::new()));
        let analyzer = FailingAnalyzer {
            calls: Rc::clone(&calls),
        };
        let mut orchestrator = Orchestrator::new(vec![Box::new(analyzer)]);
        let context = orchestrator.run(settings_for(&dir));

        assert_eq!(*calls.borrow(), vec!["a.mfst", "b.mfst"]);
        assert_eq!(context.diagnostics.error_count(), 2);
    }
}
