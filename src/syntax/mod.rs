/*!
Parsing of regular expression patterns into an abstract syntax tree.

The entry points are [`parse`], which uses the default configuration, and
[`Parser`], which can be configured with a [`Config`]. Both produce an [`Ast`],
from which length bounds and a literal [`Factorization`] can be derived.

The supported syntax is deliberately small:

* Literal characters, with `\` escaping any ASCII punctuation.
* `.`, which matches any character except `\n`.
* Bracketed classes such as `[a-z]`, `[^0-9]` or `[\w-]`.
* The Perl classes `\d`, `\w`, `\s` and their negations `\D`, `\W`, `\S`.
* The escapes `\t`, `\n`, `\r`, `\f`, `\v`, `\xHH`, `\x{H...}` and `\0ooo`.
* Groups `(...)` and `(?:...)`, alternation `|`.
* The repetition operators `*`, `+`, `?`, `{m}`, `{m,}` and `{m,n}`.

Anchors, look-around assertions, backreferences, inline flags and Unicode
property classes are rejected with an error.
*/

pub use self::{
    ast::Ast,
    error::Error,
    literal::{Factorization, Literals, MAX_LITERALS},
};

mod ast;
mod class;
mod error;
mod literal;
mod parser;

/// The configuration used to parse a pattern.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    nest_limit: Option<u32>,
}

impl Config {
    /// Return a new default syntax configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set the maximum nesting depth of groups and repetition operators.
    ///
    /// Each group and each repetition operator (`*`, `+`, `?` or `{m,n}`)
    /// nests its operand one level deeper, so both `((a))` and `a**` have a
    /// depth of 2. Patterns nested more deeply than the limit fail to parse.
    ///
    /// Concatenations and alternations are built as balanced trees, so the
    /// depth of the resulting [`Ast`], which later phases traverse
    /// recursively, grows with this limit times the logarithm of the
    /// pattern's length.
    ///
    /// The default is `250`.
    pub fn nest_limit(mut self, limit: u32) -> Config {
        self.nest_limit = Some(limit);
        self
    }

    /// Returns the nesting limit set in this configuration.
    pub fn get_nest_limit(&self) -> u32 {
        self.nest_limit.unwrap_or(250)
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used.
    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config { nest_limit: o.nest_limit.or(self.nest_limit) }
    }
}

/// A regular expression parser.
///
/// A parser holds no state between calls to [`Parser::parse`], so one
/// parser may be reused for any number of patterns.
#[derive(Clone, Debug, Default)]
pub struct Parser {
    config: Config,
}

impl Parser {
    /// Create a new parser with the default configuration.
    pub fn new() -> Parser {
        Parser::default()
    }

    /// Apply the given configuration to this parser.
    pub fn configure(&mut self, config: Config) -> &mut Parser {
        self.config = self.config.overwrite(config);
        self
    }

    /// Parse the given pattern into an abstract syntax tree.
    ///
    /// Parsing is all or nothing: if any part of the pattern is malformed, an
    /// error is returned and no tree is produced.
    pub fn parse(&self, pattern: &str) -> Result<Ast, Error> {
        let ast = parser::ParserI::new(self.config, pattern).parse()?;
        trace!("parsed {:?} into {:?}", pattern, ast);
        Ok(ast)
    }
}

/// Parse the given pattern with the default configuration.
///
/// # Example
///
/// ```
/// use char_automata::syntax::{self, Ast};
///
/// let ast = syntax::parse("ab*")?;
/// assert_eq!(1, ast.min_len());
/// assert_eq!(None, ast.max_len());
/// assert_eq!(Ast::literal("ab"), syntax::parse("ab")?);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse(pattern: &str) -> Result<Ast, Error> {
    Parser::new().parse(pattern)
}

/// Escape every meta character in `text` such that the result is a pattern
/// matching exactly `text`.
///
/// # Example
///
/// ```
/// use char_automata::syntax::{self, Ast};
///
/// let pattern = syntax::escape("1+1=2?");
/// assert_eq!(r"1\+1=2\?", pattern);
/// assert_eq!(Ast::literal("1+1=2?"), syntax::parse(&pattern)?);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn escape(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len());
    for c in text.chars() {
        if is_meta_character(c) {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted
}

/// Returns true if the given character has significance in a pattern.
pub fn is_meta_character(c: char) -> bool {
    match c {
        '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{'
        | '}' | '^' | '$' | '-' => true,
        _ => false,
    }
}
