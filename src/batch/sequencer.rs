//! Applies the enabled scripts, in order, to one open document.

use std::time::Duration;

use crate::clock::Clock;
use crate::engine::{Engine, EngineError, OpenDocument, commands};
use crate::retry::RetryPolicy;
use crate::status::StatusSink;

use super::model::ScriptRef;

/// Retry policy for every command sent to the active document. Save and
/// close reuse it; only document open gets a longer leash.
pub(crate) const COMMAND_RETRY: RetryPolicy = RetryPolicy::new(3, Duration::from_secs(2));

// The engine acknowledges commands before acting on them; these pauses stand
// in for the completion signal it never sends.
const LOAD_SETTLE: Duration = Duration::from_secs(1);
const INVOKE_SETTLE: Duration = Duration::from_secs(1);

/// Load and invoke each script against the open document, emitting one
/// Success event per completed script with its 1-based position.
///
/// A command failure that survives the retry bound propagates to the caller
/// and aborts the remaining scripts; scripts already applied stay applied.
pub async fn run_scripts<E: Engine, K: Clock>(
    doc: &mut OpenDocument<'_, E>,
    clock: &K,
    events: &StatusSink,
    doc_name: &str,
    scripts: &[ScriptRef],
) -> Result<(), EngineError> {
    let total = scripts.len();
    for (index, script) in scripts.iter().enumerate() {
        doc.send(&commands::load_script(script.path()), &COMMAND_RETRY, clock, events)
            .await?;
        clock.sleep(LOAD_SETTLE).await;

        doc.send(commands::INVOKE_ENTRY_POINT, &COMMAND_RETRY, clock, events)
            .await?;
        clock.sleep(INVOKE_SETTLE).await;

        events.success(format!(
            "{} completed for file {} (Script {} of {})",
            script.file_name(),
            doc_name,
            index + 1,
            total
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Session;
    use crate::status::Severity;
    use crate::testutil::{ManualClock, MockConnector, MockEngine, drain_statuses};
    use std::path::Path;

    const OPEN_RETRY: RetryPolicy = RetryPolicy::new(5, Duration::from_secs(4));

    fn scripts(paths: &[&str]) -> Vec<ScriptRef> {
        paths.iter().map(ScriptRef::new).collect()
    }

    #[tokio::test]
    async fn runs_scripts_in_order_with_settle_pauses() {
        let engine = MockEngine::new();
        let state = engine.state();
        let connector = MockConnector::new(engine);
        let mut session = Session::start(&connector, Path::new("/fake/engine")).unwrap();

        let clock = ManualClock::default();
        let (sink, mut rx) = StatusSink::channel();
        let mut doc = session
            .open(Path::new("/jobs/plan.dwg"), &OPEN_RETRY, &clock, &sink)
            .await
            .unwrap();

        run_scripts(
            &mut doc,
            &clock,
            &sink,
            "plan.dwg",
            &scripts(&[r"C:\lisp\first.lsp", "/lisp/second.lsp"]),
        )
        .await
        .unwrap();
        drop(doc);
        drop(sink);

        let commands = state.lock().unwrap().commands.clone();
        assert_eq!(
            commands,
            vec![
                "(load \"C:/lisp/first.lsp\")\n",
                commands::INVOKE_ENTRY_POINT,
                "(load \"/lisp/second.lsp\")\n",
                commands::INVOKE_ENTRY_POINT,
            ]
        );
        assert_eq!(
            clock.slept(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(1),
                Duration::from_secs(1),
                Duration::from_secs(1),
            ]
        );

        let events = drain_statuses(&mut rx);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].severity, Severity::Success);
        assert_eq!(
            events[0].message,
            "first.lsp completed for file plan.dwg (Script 1 of 2)"
        );
        assert_eq!(
            events[1].message,
            "second.lsp completed for file plan.dwg (Script 2 of 2)"
        );
    }

    #[tokio::test]
    async fn command_failure_aborts_remaining_scripts() {
        let engine = MockEngine::new();
        let state = engine.state();
        state.lock().unwrap().fail_commands_containing = Some(("second.lsp".into(), u32::MAX));
        let connector = MockConnector::new(engine);
        let mut session = Session::start(&connector, Path::new("/fake/engine")).unwrap();

        let clock = ManualClock::default();
        let (sink, mut rx) = StatusSink::channel();
        let mut doc = session
            .open(Path::new("/jobs/plan.dwg"), &OPEN_RETRY, &clock, &sink)
            .await
            .unwrap();

        let err = run_scripts(
            &mut doc,
            &clock,
            &sink,
            "plan.dwg",
            &scripts(&["/lisp/first.lsp", "/lisp/second.lsp", "/lisp/third.lsp"]),
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, EngineError::OperationFailed { .. }));
        drop(doc);
        drop(sink);

        // The first script completed and stays applied; the third never ran.
        let events = drain_statuses(&mut rx);
        let completions: Vec<&str> = events
            .iter()
            .filter(|e| e.severity == Severity::Success)
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(
            completions,
            vec!["first.lsp completed for file plan.dwg (Script 1 of 3)"]
        );
        let commands = state.lock().unwrap().commands.clone();
        assert!(!commands.iter().any(|c| c.contains("third.lsp")));
    }

    #[tokio::test]
    async fn empty_script_list_sends_nothing() {
        let engine = MockEngine::new();
        let state = engine.state();
        let connector = MockConnector::new(engine);
        let mut session = Session::start(&connector, Path::new("/fake/engine")).unwrap();

        let clock = ManualClock::default();
        let (sink, _rx) = StatusSink::channel();
        let mut doc = session
            .open(Path::new("/jobs/plan.dwg"), &OPEN_RETRY, &clock, &sink)
            .await
            .unwrap();

        run_scripts(&mut doc, &clock, &sink, "plan.dwg", &[])
            .await
            .unwrap();
        assert!(state.lock().unwrap().commands.is_empty());
        assert!(clock.slept().is_empty());
    }
}
