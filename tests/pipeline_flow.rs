//! Strict causal ordering of modules inside a pipeline: module *i+1* receives
//! exactly what module *i* returned, empty pipelines return empty output, and
//! a failure aborts the remaining modules.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use docflow_core::{Document, EngineError, MetadataStack, Module, Pipeline, StageContext};
use serde_json::json;

/// Keeps the first document only.
struct TakeFirst;

impl Module for TakeFirst {
    fn name(&self) -> &str {
        "take_first"
    }

    fn execute(&self, documents: &[Document], _ctx: &mut StageContext) -> Result<Vec<Document>, EngineError> {
        Ok(documents.iter().take(1).cloned().collect())
    }
}

/// Passes documents through, recording what it received.
struct Recorder {
    name: &'static str,
    seen: Arc<Mutex<Vec<Vec<Document>>>>,
}

impl Module for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn execute(&self, documents: &[Document], _ctx: &mut StageContext) -> Result<Vec<Document>, EngineError> {
        self.seen.lock().unwrap().push(documents.to_vec());
        Ok(documents.to_vec())
    }
}

struct Failing;

impl Module for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn execute(&self, _documents: &[Document], _ctx: &mut StageContext) -> Result<Vec<Document>, EngineError> {
        Err(EngineError::StageExecution { module: "failing".into(),
                                          message: "bad input".into() })
    }
}

struct MarkInvoked(Arc<AtomicBool>);

impl Module for MarkInvoked {
    fn name(&self) -> &str {
        "mark_invoked"
    }

    fn execute(&self, documents: &[Document], _ctx: &mut StageContext) -> Result<Vec<Document>, EngineError> {
        self.0.store(true, Ordering::SeqCst);
        Ok(documents.to_vec())
    }
}

fn input_docs() -> Arc<Vec<Document>> {
    Arc::new(vec![Document::with_source("d1.md", json!({"body": "uno"})),
                  Document::with_source("d2.md", json!({"body": "dos"}))])
}

#[test]
fn next_module_receives_exactly_the_previous_output() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let pipeline = Pipeline::new("narrowing",
                                 vec![Box::new(TakeFirst),
                                      Box::new(Recorder { name: "b",
                                                          seen: Arc::clone(&seen) }),
                                      Box::new(Recorder { name: "c",
                                                          seen: Arc::clone(&seen) })]);

    let input = input_docs();
    let d1 = input[0].clone();
    let output = pipeline.execute(&MetadataStack::new(), input).unwrap();

    // A returned [d1]; B and C must see exactly [d1], never [d1, d2].
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], vec![d1.clone()]);
    assert_eq!(seen[1], vec![d1.clone()]);
    assert_eq!(*output, vec![d1]);
}

#[test]
fn empty_pipeline_returns_empty_without_invoking_anything() {
    let pipeline = Pipeline::new("empty", vec![]);
    let output = pipeline.execute(&MetadataStack::new(), input_docs()).unwrap();
    assert!(output.is_empty());
}

#[test]
fn failure_aborts_remaining_modules() {
    let invoked = Arc::new(AtomicBool::new(false));
    let pipeline = Pipeline::new("failing",
                                 vec![Box::new(TakeFirst),
                                      Box::new(Failing),
                                      Box::new(MarkInvoked(Arc::clone(&invoked)))]);

    let err = pipeline.execute(&MetadataStack::new(), input_docs()).unwrap_err();
    assert!(matches!(err, EngineError::StageExecution { .. }));
    assert!(!invoked.load(Ordering::SeqCst), "module after the failure must not run");
}

/// Metadata written during prepare is visible in the same stage's execute,
/// but never in the next stage or the source stack.
struct PrepareWriter;

impl Module for PrepareWriter {
    fn name(&self) -> &str {
        "prepare_writer"
    }

    fn prepare(&self, ctx: &mut StageContext) -> Result<Option<docflow_core::PersistedObject>, EngineError> {
        ctx.metadata_mut().set("stage_note", json!("set in prepare"))?;
        Ok(None)
    }

    fn execute(&self, documents: &[Document], ctx: &mut StageContext) -> Result<Vec<Document>, EngineError> {
        assert_eq!(ctx.metadata().get("stage_note"), Some(&json!("set in prepare")));
        Ok(documents.to_vec())
    }
}

struct AssertNoNote;

impl Module for AssertNoNote {
    fn name(&self) -> &str {
        "assert_no_note"
    }

    fn execute(&self, documents: &[Document], ctx: &mut StageContext) -> Result<Vec<Document>, EngineError> {
        assert!(ctx.metadata().get("stage_note").is_none(),
                "prepare metadata must not leak across stages");
        Ok(documents.to_vec())
    }
}

#[test]
fn prepare_metadata_is_stage_local() {
    let mut source = MetadataStack::new();
    source.set("title", json!("x")).unwrap();

    let pipeline = Pipeline::new("isolation", vec![Box::new(PrepareWriter), Box::new(AssertNoNote)]);
    pipeline.execute(&source, input_docs()).unwrap();

    assert!(source.get("stage_note").is_none());
    assert_eq!(source.get("title"), Some(&json!("x")));
}

/// A module writing metadata in execute (outside the prepare window) hits the
/// lock and the metadata stays unchanged.
struct RogueWriter;

impl Module for RogueWriter {
    fn name(&self) -> &str {
        "rogue_writer"
    }

    fn execute(&self, _documents: &[Document], ctx: &mut StageContext) -> Result<Vec<Document>, EngineError> {
        ctx.metadata_mut().set("title", json!("y"))?;
        Ok(vec![])
    }
}

#[test]
fn execute_write_fails_with_locked_mutation() {
    let mut source = MetadataStack::new();
    source.set("title", json!("x")).unwrap();

    let pipeline = Pipeline::new("rogue", vec![Box::new(RogueWriter)]);
    let err = pipeline.execute(&source, input_docs()).unwrap_err();

    assert_eq!(err, EngineError::LockedMutation { key: "title".into() });
    assert_eq!(source.get("title"), Some(&json!("x")));
}
