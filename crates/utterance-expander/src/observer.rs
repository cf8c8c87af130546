/*
 * observer.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Diagnostic sink for expansion progress and anomalies.
 */

//! Observer abstraction for expansion events.
//!
//! The expander never logs directly. It reports progress and anomalies to an
//! [`ExpansionObserver`], which lets callers choose between:
//! - silence ([`NoopObserver`], the default)
//! - `tracing` events ([`TracingObserver`])
//! - collecting events for later inspection ([`RecordingObserver`])
//!
//! Observers are purely observational and cannot change the produced sentences.

use std::sync::Mutex;

use crate::grammar::Rule;

/// Event severity level for expansion events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    /// Per-step progress
    Trace,
    /// Anomalies that drop or alter a branch without stopping the expansion
    Warn,
}

impl EventLevel {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventLevel::Trace => "trace",
            EventLevel::Warn => "warn",
        }
    }
}

/// Observer for expansion events.
///
/// All methods have empty default implementations, allowing observers
/// to implement only the events they care about.
///
/// Implementations must be `Send + Sync` so one observer can be shared by
/// expansions running on several threads.
pub trait ExpansionObserver: Send + Sync {
    /// Called when a fragment is rewritten into `variants` new pending strings.
    fn on_rewrite(&self, _rule: Rule, _fragment: &str, _variants: usize) {}

    /// Called when a fully expanded sentence is appended to the output.
    fn on_emit(&self, _rule: Rule, _sentence: &str) {}

    /// Called when a fragment matches no rule and is dropped.
    fn on_unrecognized(&self, _fragment: &str) {}

    /// Called when `$name` has no value in the variable store.
    fn on_undefined_variable(&self, _name: &str, _fragment: &str) {}

    /// Called when the substitution depth ceiling stops an expansion.
    fn on_limit_reached(&self, _limit: usize, _template: &str) {}
}

/// No-op observer implementation.
///
/// This is the observer used when none is specified; expansion stays silent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl NoopObserver {
    pub fn new() -> Self {
        Self
    }
}

impl ExpansionObserver for NoopObserver {}

/// Observer that emits `tracing` events.
///
/// Progress goes out at trace level, anomalies at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl ExpansionObserver for TracingObserver {
    fn on_rewrite(&self, rule: Rule, fragment: &str, variants: usize) {
        tracing::trace!(rule = rule.as_str(), variants, fragment, "Rewrote fragment");
    }

    fn on_emit(&self, rule: Rule, sentence: &str) {
        tracing::trace!(rule = rule.as_str(), sentence, "Emitted sentence");
    }

    fn on_unrecognized(&self, fragment: &str) {
        tracing::warn!(fragment, "Can't grok fragment, dropping it");
    }

    fn on_undefined_variable(&self, name: &str, fragment: &str) {
        tracing::warn!(
            variable = name,
            fragment,
            "Undefined variable, substituting empty text"
        );
    }

    fn on_limit_reached(&self, limit: usize, template: &str) {
        tracing::warn!(
            limit,
            template,
            "Variable substitution depth limit reached, expansion stopped"
        );
    }
}

/// An event captured by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionEvent {
    Rewrite {
        rule: Rule,
        fragment: String,
        variants: usize,
    },
    Emit {
        rule: Rule,
        sentence: String,
    },
    Unrecognized {
        fragment: String,
    },
    UndefinedVariable {
        name: String,
        fragment: String,
    },
    LimitReached {
        limit: usize,
        template: String,
    },
}

impl ExpansionEvent {
    pub fn level(&self) -> EventLevel {
        match self {
            ExpansionEvent::Rewrite { .. } | ExpansionEvent::Emit { .. } => EventLevel::Trace,
            ExpansionEvent::Unrecognized { .. }
            | ExpansionEvent::UndefinedVariable { .. }
            | ExpansionEvent::LimitReached { .. } => EventLevel::Warn,
        }
    }
}

/// Observer that records every event in order.
///
/// Useful for callers that want to surface dropped fragments or undefined
/// variables after the fact.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ExpansionEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: ExpansionEvent) {
        // A poisoned lock only means another recorder panicked mid-push
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(event);
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<ExpansionEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Only the warn-level events.
    pub fn warnings(&self) -> Vec<ExpansionEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level() == EventLevel::Warn)
            .collect()
    }

    /// Consume the observer and return the recorded events.
    pub fn into_events(self) -> Vec<ExpansionEvent> {
        self.events.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl ExpansionObserver for RecordingObserver {
    fn on_rewrite(&self, rule: Rule, fragment: &str, variants: usize) {
        self.record(ExpansionEvent::Rewrite {
            rule,
            fragment: fragment.to_string(),
            variants,
        });
    }

    fn on_emit(&self, rule: Rule, sentence: &str) {
        self.record(ExpansionEvent::Emit {
            rule,
            sentence: sentence.to_string(),
        });
    }

    fn on_unrecognized(&self, fragment: &str) {
        self.record(ExpansionEvent::Unrecognized {
            fragment: fragment.to_string(),
        });
    }

    fn on_undefined_variable(&self, name: &str, fragment: &str) {
        self.record(ExpansionEvent::UndefinedVariable {
            name: name.to_string(),
            fragment: fragment.to_string(),
        });
    }

    fn on_limit_reached(&self, limit: usize, template: &str) {
        self.record(ExpansionEvent::LimitReached {
            limit,
            template: template.to_string(),
        });
    }
}
