//! Transition parser using chumsky
//!
//! Each line of input is tried on its own against
//! `<source> -> <target> [ : <name> [ / <action> ] ]`. Lines that do not
//! have that shape are dropped without a diagnostic.

use super::database::StateDatabase;
use crate::core::{Parser as CoreParser, Transition};
use anyhow::Result;
use chumsky::prelude::*;
use tracing::{debug, info, span, trace, Level};

/// Raw segments of one matched line, before trimming
#[derive(Debug, Clone, PartialEq)]
struct RawTransition {
    source: String,
    target: String,
    name: Option<String>,
    action: Option<String>,
}

/// Line-oriented transition parser
pub struct TransitionParser;

impl TransitionParser {
    pub fn new() -> Self {
        Self
    }

    /// Source: at least one character, up to the first `->` after it
    fn source_parser<'src>() -> impl chumsky::Parser<'src, &'src str, String> + Clone {
        any()
            .then(
                any()
                    .and_is(just("->").not())
                    .repeated()
                    .collect::<String>(),
            )
            .map(|(first, rest)| format!("{first}{rest}"))
    }

    /// Target: at least one character, up to the first `:` after it
    fn target_parser<'src>() -> impl chumsky::Parser<'src, &'src str, String> + Clone {
        any()
            .then(none_of(':').repeated().collect::<String>())
            .map(|(first, rest)| format!("{first}{rest}"))
    }

    /// Label: `: name` optionally followed by `/ action`
    ///
    /// The action runs to the end of the line, so further `/` characters
    /// belong to it.
    fn label_parser<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, (String, Option<String>)> + Clone {
        let name = none_of('/').repeated().collect::<String>();
        let action = just('/').ignore_then(any().repeated().collect::<String>());

        just(':').ignore_then(name).then(action.or_not())
    }

    fn line_parser<'src>() -> impl chumsky::Parser<'src, &'src str, RawTransition> + Clone {
        Self::source_parser()
            .then_ignore(just("->"))
            .then(Self::target_parser())
            .then(Self::label_parser().or_not())
            .then_ignore(end())
            .map(|((source, target), label)| {
                let (name, action) = match label {
                    Some((name, action)) => (Some(name), action),
                    None => (None, None),
                };
                RawTransition {
                    source,
                    target,
                    name,
                    action,
                }
            })
    }

    /// Parse a single line into a transition
    ///
    /// Returns `None` for lines without the transition shape. An endpoint of
    /// only whitespace trims down to the empty state id.
    pub fn parse_line(&self, line: &str) -> Option<Transition> {
        let raw = Self::line_parser().parse(line).into_result().ok()?;

        Some(Transition {
            from: raw.source.trim().to_string(),
            to: raw.target.trim().to_string(),
            name: non_blank(raw.name),
            action: non_blank(raw.action),
        })
    }

    /// Parse raw text into a fresh database
    ///
    /// Total: input without any transition yields an empty database.
    pub fn parse_text(&self, input: &str) -> StateDatabase {
        let parse_span = span!(Level::INFO, "parse_transitions", input_len = input.len());
        let _enter = parse_span.enter();

        let mut database = StateDatabase::new();
        let mut skipped = 0usize;
        for (index, line) in input.lines().enumerate() {
            match self.parse_line(line) {
                Some(transition) => {
                    trace!(line = index + 1, %transition, "Parsed transition");
                    database.add_transition(transition);
                }
                None => skipped += 1,
            }
        }

        debug!(
            states = database.state_count(),
            transitions = database.transition_count(),
            skipped,
            "Parsed transitions"
        );
        info!("Parsing completed");
        database
    }
}

fn non_blank(segment: Option<String>) -> Option<String> {
    segment
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl Default for TransitionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreParser<StateDatabase> for TransitionParser {
    fn parse(&self, input: &str, database: &mut StateDatabase) -> Result<()> {
        *database = self.parse_text(input);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "transitions"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        input.lines().any(|line| self.parse_line(line).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<Transition> {
        TransitionParser::new().parse_line(line)
    }

    #[test]
    fn test_parse_simple_transition() {
        assert_eq!(parse("A->B"), Some(Transition::new("A", "B")));
    }

    #[test]
    fn test_parse_trims_segments() {
        assert_eq!(
            parse("  Idle  ->  Running  :  start  /  spin up "),
            Some(Transition::with_name("Idle", "Running", "start").and_action("spin up"))
        );
    }

    #[test]
    fn test_parse_name_only() {
        assert_eq!(parse("A->B: go"), Some(Transition::with_name("A", "B", "go")));
    }

    #[test]
    fn test_parse_name_and_action() {
        assert_eq!(
            parse("B->A: back/reset"),
            Some(Transition::with_name("B", "A", "back").and_action("reset"))
        );
    }

    #[test]
    fn test_whitespace_name_is_absent() {
        assert_eq!(parse("A->B:   "), Some(Transition::new("A", "B")));
        assert_eq!(parse("A->B:  /  "), Some(Transition::new("A", "B")));
    }

    #[test]
    fn test_action_without_name() {
        let t = parse("A->B: / reset").unwrap();
        assert_eq!(t.name, None);
        assert_eq!(t.action.as_deref(), Some("reset"));
    }

    #[test]
    fn test_trailing_text_stays_in_action() {
        let t = parse("A->B: go/reset/extra: junk").unwrap();
        assert_eq!(t.name.as_deref(), Some("go"));
        assert_eq!(t.action.as_deref(), Some("reset/extra: junk"));
    }

    #[test]
    fn test_name_may_contain_colon() {
        let t = parse("A->B: at 10:30").unwrap();
        assert_eq!(t.name.as_deref(), Some("at 10:30"));
    }

    #[test]
    fn test_target_splits_on_first_arrow_only() {
        assert_eq!(parse("A->B->C"), Some(Transition::new("A", "B->C")));
    }

    #[test]
    fn test_source_needs_one_character_before_arrow() {
        assert_eq!(parse("-->B"), Some(Transition::new("-", "B")));
        assert_eq!(parse("->A->B"), Some(Transition::new("->A", "B")));
    }

    #[test]
    fn test_target_may_start_with_colon() {
        assert_eq!(parse("A->:x"), Some(Transition::new("A", ":x")));
    }

    #[test]
    fn test_self_transition() {
        assert_eq!(parse("A->A"), Some(Transition::new("A", "A")));
    }

    #[test]
    fn test_non_matching_lines() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("not a transition"), None);
        assert_eq!(parse("A->"), None);
        assert_eq!(parse("->B"), None);
        assert_eq!(parse("A - > B"), None);
    }

    #[test]
    fn test_blank_endpoints_become_empty_state() {
        assert_eq!(parse("  ->B"), Some(Transition::new("", "B")));
        assert_eq!(parse("A->  "), Some(Transition::new("A", "")));
        assert_eq!(parse("A->  : go"), Some(Transition::with_name("A", "", "go")));

        let db = TransitionParser::new().parse_text(" ->B\nA-> ");
        assert_eq!(db.transition_count(), 2);
        let states: Vec<&str> = db.states().iter().map(String::as_str).collect();
        assert_eq!(states, vec!["", "B", "A"]);
    }

    #[test]
    fn test_parse_text_collects_states() {
        let db = TransitionParser::new().parse_text("A->B: go\nB->A: back/reset");
        assert_eq!(db.state_count(), 2);
        assert_eq!(db.transition_count(), 2);
    }

    #[test]
    fn test_parse_text_handles_crlf() {
        let db = TransitionParser::new().parse_text("A->B\r\nB->C\r\n");
        assert_eq!(db.transitions()[0], Transition::new("A", "B"));
        assert_eq!(db.state_count(), 3);
    }

    #[test]
    fn test_trait_parse_replaces_database() {
        let parser = TransitionParser::new();
        let mut db = StateDatabase::new();
        parser.parse("A->B", &mut db).unwrap();
        parser.parse("C->D", &mut db).unwrap();
        assert!(!db.contains_state("A"));
        assert!(db.contains_state("D"));
    }

    #[test]
    fn test_can_parse() {
        let parser = TransitionParser::new();
        assert!(parser.can_parse("# machine\nIdle->Busy"));
        assert!(!parser.can_parse("graph TD"));
        assert_eq!(parser.name(), "transitions");
    }
}
