//! Predicate recording.
//!
//! The recorder is the only mutable state of a verification run: every
//! predicate outcome flows into it with a breadcrumb context, and the
//! aggregate failure flag is sticky.

use std::fmt;

use crate::Code;

/// The breadcrumb path from the election root to the current node.
///
/// Parents hand each child a copy extended with the child's label, so
/// sibling subtrees cannot disturb one another.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context(Vec<String>);

impl Context {
    /// A root context with a single label.
    #[must_use]
    pub fn root(label: impl Into<String>) -> Self {
        Self(vec![label.into()])
    }

    /// This context extended with one more label.
    #[must_use]
    pub fn child(&self, label: impl Into<String>) -> Self {
        let mut path = self.0.clone();
        path.push(label.into());
        Self(path)
    }

    /// The labels from root to leaf.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" / "))
    }
}

/// A sink for predicate outcomes.
pub trait Recorder {
    /// Records one predicate outcome.
    fn record(&mut self, status: bool, context: &Context, name: Code, title: &str);

    /// Whether every predicate recorded so far passed.
    fn all_passed(&self) -> bool;
}

/// A recorder that prints each predicate as an `OK:`/`FAIL:` line; the
/// audit trail of the command-line verifier.
#[derive(Debug, Default)]
pub struct LogRecorder {
    failed: bool,
}

impl LogRecorder {
    /// A fresh recorder with no failures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Recorder for LogRecorder {
    #[allow(
        clippy::print_stdout,
        reason = "The printed audit trail is the verifier's primary output"
    )]
    fn record(&mut self, status: bool, context: &Context, name: Code, title: &str) {
        if status {
            println!("OK:  {context} | {name}: {title}");
        } else {
            self.failed = true;
            println!("FAIL: {context} | {name}: {title}");
        }
    }

    fn all_passed(&self) -> bool {
        !self.failed
    }
}

/// A failed predicate as captured by the [`CollectingRecorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Where in the walk the predicate was emitted.
    pub context: Context,
    /// The predicate's stable name.
    pub name: Code,
    /// The advisory title or error message.
    pub title: String,
}

/// A recorder that keeps failing predicates in emission order; used by
/// tests to assert on the exact audit trail.
#[derive(Debug, Default)]
pub struct CollectingRecorder {
    failures: Vec<Failure>,
    recorded: usize,
}

impl CollectingRecorder {
    /// A fresh recorder with no failures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The failures recorded so far, in order.
    #[must_use]
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Total number of predicates recorded, passing or failing.
    #[must_use]
    pub fn recorded(&self) -> usize {
        self.recorded
    }
}

impl Recorder for CollectingRecorder {
    fn record(&mut self, status: bool, context: &Context, name: Code, title: &str) {
        self.recorded += 1;
        if !status {
            self.failures.push(Failure {
                context: context.clone(),
                name,
                title: title.to_owned(),
            });
        }
    }

    fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}
