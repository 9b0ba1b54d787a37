//! Leftmost-derivation search with copy-on-fork candidates.
//!
//! Each [`ParseNode`] is one partial derivation. Forking clones the node, so
//! branches never observe each other. Rule actions are not run during the
//! search; the winning node's trace is replayed once the whole input has been
//! derived.

use tracing::{debug, trace};

use crate::errors::{unspanned, CowabungaError, ErrorKind, ErrorReporting};
use crate::grammar::rule::{default_error, GrammarRule, ParseFailure};
use crate::grammar::symbol::Symbol;
use crate::syntax::{Span, Token};

// ============================================================================
// GRAMMAR
// ============================================================================

/// A start symbol and its rule table, sorted by left-hand side id.
pub struct Grammar<C> {
    rules: Vec<Box<dyn GrammarRule<C>>>,
    start: Symbol,
}

impl<C> Grammar<C> {
    pub fn new(start: Symbol) -> Self {
        Self {
            rules: Vec::new(),
            start,
        }
    }

    /// Adds a rule after any existing rules with the same left-hand side, so
    /// alternatives keep their insertion order within a slice.
    pub fn add_rule(mut self, rule: impl GrammarRule<C> + 'static) -> Self {
        let id = rule.lhs().id;
        let at = self.rules.partition_point(|r| r.lhs().id <= id);
        self.rules.insert(at, Box::new(rule));
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn GrammarRule<C>> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Half-open index range of the rules expanding `nonterminal`.
    fn rules_for(&self, nonterminal: Symbol) -> std::ops::Range<usize> {
        let begin = self.rules.partition_point(|r| r.lhs().id < nonterminal.id);
        let end = self
            .rules
            .partition_point(|r| r.lhs().id < nonterminal.id + 1);
        begin..end
    }

    /// Derives `tokens` from the start symbol.
    ///
    /// On success every rule of the accepted derivation has been applied to
    /// `ctx` exactly once, innermost first. On failure `ctx` is untouched and
    /// the error comes from the hook of the rule that owned the furthest
    /// failure. An empty token range is accepted without running any action.
    pub fn parse(
        &self,
        tokens: &[Token],
        ctx: &mut C,
        reporter: &dyn ErrorReporting,
    ) -> Result<(), CowabungaError> {
        if tokens.is_empty() {
            return Ok(());
        }
        debug!(start = %self.start, tokens = tokens.len(), rules = self.rules.len(), "grammar parse");

        let mut worklist = vec![ParseNode::new(self.start)];
        let mut furthest: Option<Candidate> = None;
        let mut explored = 0usize;

        while let Some(mut node) = worklist.pop() {
            explored += 1;
            if !node.consume_terminals(tokens) {
                record_failure(&mut furthest, &node, tokens);
                continue;
            }
            if node.is_complete(tokens) {
                debug!(explored, "grammar parse accepted");
                self.replay(&node, tokens, ctx);
                return Ok(());
            }
            let Some(top) = node.symbols.last().copied() else {
                continue;
            };
            let alternatives = self.rules_for(top);
            if alternatives.is_empty() {
                trace!(symbol = %top, "no rule expands symbol");
                record_failure(&mut furthest, &node, tokens);
                continue;
            }
            for index in alternatives {
                let rule = &self.rules[index];
                trace!(rule = %rule.name(), cursor = node.cursor, "expand");
                let mut branch = node.clone();
                branch.apply_rule(index, rule.rhs());
                worklist.push(branch);
            }
        }

        let Some(candidate) = furthest else {
            return Err(reporter.report(
                ErrorKind::NoRules {
                    symbol: self.start.to_string(),
                },
                unspanned(),
            ));
        };
        debug!(
            explored,
            position = candidate.failure.position,
            eof_found = candidate.failure.eof_found,
            eof_expected = candidate.failure.eof_expected,
            "grammar parse rejected"
        );
        Err(match candidate.rule {
            Some(index) => self.rules[index].produce_error(&candidate.failure, reporter),
            None => default_error(&candidate.failure, reporter, |s| s.to_string()),
        })
    }

    fn replay(&self, node: &ParseNode, tokens: &[Token], ctx: &mut C) {
        for &(index, position) in node.trace.iter().rev() {
            self.rules[index].apply(ctx, &tokens[position]);
        }
    }
}

// ============================================================================
// SEARCH STATE
// ============================================================================

/// One candidate derivation.
#[derive(Debug, Clone)]
struct ParseNode {
    cursor: usize,
    /// Pending symbols; the last element is the next one to satisfy.
    symbols: Vec<Symbol>,
    /// Open rule applications and how many of their symbols are still pending.
    /// `None` owns the start symbol.
    arity: Vec<(Option<usize>, usize)>,
    /// `(rule index, cursor)` in the order rules were applied.
    trace: Vec<(usize, usize)>,
    /// Rule owning the most recently resolved symbol.
    latest_rule: Option<usize>,
}

impl ParseNode {
    fn new(start: Symbol) -> Self {
        Self {
            cursor: 0,
            symbols: vec![start],
            arity: vec![(None, 1)],
            trace: Vec::new(),
            latest_rule: None,
        }
    }

    /// Matches leading terminals against the input. Returns false if this
    /// node is dead: a mismatch, or exactly one of stack and input exhausted.
    fn consume_terminals(&mut self, tokens: &[Token]) -> bool {
        while let (Some(top), Some(token)) = (self.symbols.last().copied(), tokens.get(self.cursor)) {
            if !top.is_terminal() {
                break;
            }
            if top.id != token.id {
                return false;
            }
            self.symbols.pop();
            self.resolve_symbol();
            self.cursor += 1;
        }
        self.symbols.is_empty() == self.input_exhausted(tokens)
    }

    fn is_complete(&self, tokens: &[Token]) -> bool {
        self.symbols.is_empty() && self.input_exhausted(tokens)
    }

    fn input_exhausted(&self, tokens: &[Token]) -> bool {
        self.cursor >= tokens.len()
    }

    fn resolve_symbol(&mut self) {
        if let Some((owner, remaining)) = self.arity.last_mut() {
            *remaining -= 1;
            self.latest_rule = *owner;
            if *remaining == 0 {
                self.arity.pop();
            }
        }
    }

    fn apply_rule(&mut self, index: usize, rhs: &[Symbol]) {
        self.symbols.pop();
        self.resolve_symbol();
        self.trace.push((index, self.cursor));
        if rhs.is_empty() {
            self.latest_rule = Some(index);
        } else {
            self.arity.push((Some(index), rhs.len()));
        }
        self.symbols.extend(rhs.iter().rev().copied());
    }

    /// The rule whose pending symbols failed, or the last one that made progress.
    fn owner(&self) -> Option<usize> {
        self.arity
            .last()
            .and_then(|(owner, _)| *owner)
            .or(self.latest_rule)
    }
}

struct Candidate {
    rule: Option<usize>,
    failure: ParseFailure,
}

/// Keeps the dead node that got furthest; ties keep the earlier one.
fn record_failure(furthest: &mut Option<Candidate>, node: &ParseNode, tokens: &[Token]) {
    if furthest
        .as_ref()
        .is_some_and(|best| node.cursor <= best.failure.position)
    {
        return;
    }
    let eof_expected = node.symbols.is_empty();
    let eof_found = !eof_expected && node.input_exhausted(tokens);
    let found = tokens.get(node.cursor).cloned();
    let span = match &found {
        Some(token) => token.span,
        None => tokens
            .last()
            .map(|t| Span::new(t.span.end, t.span.end))
            .unwrap_or_default(),
    };
    trace!(cursor = node.cursor, eof_found, eof_expected, "failure candidate");
    *furthest = Some(Candidate {
        rule: node.owner(),
        failure: ParseFailure {
            position: node.cursor,
            expected: node.symbols.last().copied(),
            found,
            span,
            eof_found,
            eof_expected,
        },
    });
}
