//! Text-to-database parser trait

use anyhow::Result;

use super::Database;

/// Turns diagram text into a [`Database`]
///
/// # Example
/// ```
/// use circles::core::{Database, Parser};
/// use circles::machine::{StateDatabase, TransitionParser};
///
/// let parser = TransitionParser::new();
/// let db: StateDatabase = parser.parse_fresh("A->B\nB->C").unwrap();
/// assert_eq!(db.node_count(), 3);
/// assert!(parser.can_parse("A->B"));
/// ```
pub trait Parser<D: Database>: Send + Sync {
    /// Replace the contents of `database` with what `input` describes
    fn parse(&self, input: &str, database: &mut D) -> Result<()>;

    fn name(&self) -> &'static str;

    fn version(&self) -> &'static str;

    /// True if at least part of `input` is in this parser's notation
    fn can_parse(&self, input: &str) -> bool;

    /// Parse into a new, empty database
    fn parse_fresh(&self, input: &str) -> Result<D>
    where
        D: Default,
    {
        let mut database = D::default();
        self.parse(input, &mut database)?;
        Ok(database)
    }
}
