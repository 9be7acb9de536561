/*!
A single pass parser that turns a pattern string into an [`Ast`].

The parser does not use recursive descent. Instead, it scans the pattern left
to right and maintains an explicit stack of partially built items. Groups and
pending alternations are represented by marker items on that stack, and are
collapsed into a single subtree when the matching `)` or the end of the
pattern is reached.

Sequences and chains of `|` become balanced trees, so a long pattern does
not produce a deep [`Ast`]. Groups and repetition operators do add depth,
and are counted against the configured
[`nest_limit`](crate::syntax::Config::nest_limit).
*/

use core::cell::{Cell, RefCell};

use crate::{
    syntax::{
        ast::Ast,
        class::{ClassSet, PerlClass},
        error::{Error, ErrorKind},
        Config,
    },
    util::range::{CharRange, MAX_CHAR},
};

/// An item on the parser's stack.
#[derive(Debug)]
enum Item {
    /// A run of adjacent literal characters. Subsequent literal characters
    /// are appended to it, unless a repetition operator splits it.
    Literal(String),
    /// A complete expression that must be treated as a single operand, e.g.,
    /// a group, a class or a repetition. `depth` counts the groups and
    /// repetition operators nested inside it, itself included.
    Expr { ast: Ast, depth: u32 },
    /// The opening `(` of a group at the given offset.
    Group { offset: usize },
    /// The complete alternates of a chain of `|`, the last of which is at
    /// `offset`. The alternate after it is still being parsed.
    Alternation { branches: Vec<Ast>, depth: u32, offset: usize },
}

/// The result of parsing an escape sequence.
#[derive(Debug)]
enum Escape {
    /// A single character code. It is not necessarily a valid `char`.
    Code(u32),
    /// A Perl class such as `\d` or `\W`.
    Class(ClassSet),
}

/// A member of a bracketed class, before ranges are resolved.
#[derive(Debug)]
enum ClassAtom {
    Code(u32),
    Class(ClassSet),
}

/// The parser state for a single pattern.
pub(crate) struct ParserI<'p> {
    config: Config,
    pattern: &'p str,
    pos: Cell<usize>,
    depth: Cell<u32>,
    stack: RefCell<Vec<Item>>,
}

impl<'p> ParserI<'p> {
    pub(crate) fn new(config: Config, pattern: &'p str) -> ParserI<'p> {
        ParserI {
            config,
            pattern,
            pos: Cell::new(0),
            depth: Cell::new(0),
            stack: RefCell::new(vec![]),
        }
    }

    pub(crate) fn parse(&self) -> Result<Ast, Error> {
        while !self.is_eof() {
            let c = self.char();
            match c {
                '(' => self.open_group()?,
                ')' => self.close_group()?,
                '|' => self.push_alternation()?,
                '*' | '+' | '?' => self.push_repetition(c)?,
                '{' => self.push_counted_repetition()?,
                '[' => {
                    let ast = self.parse_class()?;
                    self.push_expr(ast);
                }
                ']' => {
                    return Err(
                        self.error(self.offset(), ErrorKind::ClassUnopened)
                    );
                }
                '.' => {
                    let start = self.offset();
                    self.bump();
                    self.push_class(ClassSet::dot(), start)?;
                }
                '^' | '$' => {
                    return Err(self.error(
                        self.offset(),
                        ErrorKind::Unsupported("anchors"),
                    ));
                }
                '\\' => {
                    let start = self.offset();
                    match self.parse_escape()? {
                        Escape::Code(code) => {
                            let c = core::char::from_u32(code).ok_or_else(
                                || {
                                    self.error(
                                        start,
                                        ErrorKind::CodepointInvalid,
                                    )
                                },
                            )?;
                            self.push_literal_char(c);
                        }
                        Escape::Class(set) => self.push_class(set, start)?,
                    }
                }
                c => {
                    self.bump();
                    self.push_literal_char(c);
                }
            }
        }
        let seq = self.close_sequence()?;
        if let Some(Item::Group { offset }) = self.stack.borrow_mut().pop() {
            return Err(self.error(offset, ErrorKind::GroupUnclosed));
        }
        Ok(seq.map_or_else(|| Ast::literal(""), |(ast, _)| ast))
    }

    fn error(&self, offset: usize, kind: ErrorKind) -> Error {
        Error::new(self.pattern, offset, kind)
    }

    fn offset(&self) -> usize {
        self.pos.get()
    }

    fn is_eof(&self) -> bool {
        self.offset() == self.pattern.len()
    }

    /// Return the character at the current position.
    ///
    /// # Panics
    ///
    /// This panics when the parser is at the end of the pattern.
    fn char(&self) -> char {
        let offset = self.offset();
        self.pattern[offset..]
            .chars()
            .next()
            .unwrap_or_else(|| panic!("expected char at offset {}", offset))
    }

    /// Return the character after the current one, if any.
    fn peek(&self) -> Option<char> {
        if self.is_eof() {
            return None;
        }
        let next = self.offset() + self.char().len_utf8();
        self.pattern[next..].chars().next()
    }

    /// Move past the current character. Returns false if the parser is at
    /// the end of the pattern after advancing.
    fn bump(&self) -> bool {
        if self.is_eof() {
            return false;
        }
        self.pos.set(self.offset() + self.char().len_utf8());
        !self.is_eof()
    }

    /// Consume the given character if it is the current one.
    fn bump_if(&self, c: char) -> bool {
        if !self.is_eof() && self.char() == c {
            self.bump();
            true
        } else {
            false
        }
    }

    fn push_literal_char(&self, c: char) {
        let mut stack = self.stack.borrow_mut();
        if let Some(Item::Literal(s)) = stack.last_mut() {
            s.push(c);
            return;
        }
        stack.push(Item::Literal(c.to_string()));
    }

    fn push_expr(&self, ast: Ast) {
        self.push_nested(ast, 0);
    }

    fn push_nested(&self, ast: Ast, depth: u32) {
        self.stack.borrow_mut().push(Item::Expr { ast, depth });
    }

    /// Wrap an operand of nesting depth `depth` in one more group or
    /// repetition, failing if that passes the nesting limit.
    ///
    /// Sequences and alternations are built as balanced trees, so this
    /// limit also bounds the depth of the final `Ast` up to a logarithmic
    /// factor.
    fn nest(&self, depth: u32, offset: usize) -> Result<u32, Error> {
        let limit = self.config.get_nest_limit();
        if depth >= limit {
            return Err(
                self.error(offset, ErrorKind::NestLimitExceeded(limit))
            );
        }
        Ok(depth + 1)
    }

    fn push_class(&self, set: ClassSet, offset: usize) -> Result<(), Error> {
        let ast = set
            .into_ast()
            .ok_or_else(|| self.error(offset, ErrorKind::ClassEmpty))?;
        self.push_expr(ast);
        Ok(())
    }

    fn open_group(&self) -> Result<(), Error> {
        let offset = self.offset();
        self.bump();
        if self.bump_if('?') && !self.bump_if(':') {
            return Err(
                self.error(offset, ErrorKind::Unsupported("inline flags"))
            );
        }
        let depth = self.depth.get() + 1;
        if depth > self.config.get_nest_limit() {
            return Err(self.error(
                offset,
                ErrorKind::NestLimitExceeded(self.config.get_nest_limit()),
            ));
        }
        self.depth.set(depth);
        self.stack.borrow_mut().push(Item::Group { offset });
        Ok(())
    }

    fn close_group(&self) -> Result<(), Error> {
        let offset = self.offset();
        let seq = self.close_sequence()?;
        let open = match self.stack.borrow_mut().pop() {
            Some(Item::Group { offset }) => offset,
            _ => return Err(self.error(offset, ErrorKind::GroupUnopened)),
        };
        self.bump();
        self.depth.set(self.depth.get() - 1);
        let (ast, depth) = seq.unwrap_or_else(|| (Ast::literal(""), 0));
        let depth = self.nest(depth, open)?;
        self.push_nested(ast, depth);
        Ok(())
    }

    fn push_alternation(&self) -> Result<(), Error> {
        let offset = self.offset();
        let (alternate, depth) = self
            .collapse_sequence()
            .ok_or_else(|| self.error(offset, ErrorKind::AlternationEmpty))?;
        let mut stack = self.stack.borrow_mut();
        match stack.last_mut() {
            Some(Item::Alternation { branches, depth: max, offset: last }) => {
                branches.push(alternate);
                *max = (*max).max(depth);
                *last = offset;
            }
            _ => stack.push(Item::Alternation {
                branches: vec![alternate],
                depth,
                offset,
            }),
        }
        drop(stack);
        self.bump();
        Ok(())
    }

    /// Pop every item up to the nearest group or alternation marker and
    /// concatenate them, in order, into a single expression along with its
    /// nesting depth. The marker is left on the stack. Returns `None` if
    /// there are no such items.
    fn collapse_sequence(&self) -> Option<(Ast, u32)> {
        let mut stack = self.stack.borrow_mut();
        let mut items = vec![];
        let mut depth = 0;
        while let Some(item) = stack.pop() {
            match item {
                Item::Literal(s) => items.push(Ast::literal(s)),
                Item::Expr { ast, depth: d } => {
                    depth = depth.max(d);
                    items.push(ast);
                }
                marker => {
                    stack.push(marker);
                    break;
                }
            }
        }
        // Items were popped in reverse.
        items.reverse();
        Ast::concat_all(items).map(|ast| (ast, depth))
    }

    /// Collapse the current sequence and resolve a pending alternation
    /// beneath it, if there is one.
    fn close_sequence(&self) -> Result<Option<(Ast, u32)>, Error> {
        let seq = self.collapse_sequence();
        let mut stack = self.stack.borrow_mut();
        match stack.pop() {
            Some(Item::Alternation { mut branches, depth, offset }) => {
                let (last, d) = seq.ok_or_else(|| {
                    self.error(offset, ErrorKind::AlternationEmpty)
                })?;
                branches.push(last);
                let ast = Ast::alternation_all(branches)
                    .expect("an alternation has at least two alternates");
                Ok(Some((ast, depth.max(d))))
            }
            Some(item) => {
                stack.push(item);
                Ok(seq)
            }
            None => Ok(seq),
        }
    }

    /// Pop the operand of a repetition operator at `offset`.
    ///
    /// When the top of the stack is a run of several literal characters,
    /// only the last character is the operand and the rest stays behind.
    /// The returned depth is that of the repetition about to be built.
    fn pop_repetition_operand(
        &self,
        offset: usize,
    ) -> Result<(Ast, u32), Error> {
        let mut stack = self.stack.borrow_mut();
        let (inner, depth) = match stack.pop() {
            Some(Item::Literal(mut s)) => match s.pop() {
                None => (Ast::literal(s), 0),
                Some(last) => {
                    if !s.is_empty() {
                        stack.push(Item::Literal(s));
                    }
                    (Ast::literal(last.to_string()), 0)
                }
            },
            Some(Item::Expr { ast, depth }) => (ast, depth),
            item => {
                stack.extend(item);
                return Err(self.error(offset, ErrorKind::RepetitionMissing));
            }
        };
        drop(stack);
        Ok((inner, self.nest(depth, offset)?))
    }

    fn push_repetition(&self, op: char) -> Result<(), Error> {
        let offset = self.offset();
        let (inner, depth) = self.pop_repetition_operand(offset)?;
        self.bump();
        let ast = match op {
            '*' => Ast::repetition(inner),
            '+' => Ast::concat(inner.clone(), Ast::repetition(inner)),
            '?' => Ast::counted(inner, 0, 1),
            _ => unreachable!("invalid repetition operator {:?}", op),
        };
        self.push_nested(ast, depth);
        Ok(())
    }

    /// Parse `{m}`, `{m,}` or `{m,n}` and apply it to the preceding operand.
    fn push_counted_repetition(&self) -> Result<(), Error> {
        let start = self.offset();
        let (inner, depth) = self.pop_repetition_operand(start)?;
        let unclosed =
            || self.error(start, ErrorKind::RepetitionCountUnclosed);
        if !self.bump() {
            return Err(unclosed());
        }
        let min = self.parse_decimal()?;
        if self.is_eof() {
            return Err(unclosed());
        }
        let max = if self.bump_if(',') {
            if self.is_eof() {
                return Err(unclosed());
            }
            if self.char() == '}' {
                None
            } else {
                Some(self.parse_decimal()?)
            }
        } else {
            Some(min)
        };
        if !self.bump_if('}') {
            return Err(unclosed());
        }
        let ast = match max {
            Some(max) if min > max => {
                return Err(
                    self.error(start, ErrorKind::RepetitionCountInvalid)
                );
            }
            Some(max) => Ast::counted(inner, min, max),
            None if min == 0 => Ast::repetition(inner),
            None => Ast::concat(
                Ast::counted(inner.clone(), min, min),
                Ast::repetition(inner),
            ),
        };
        self.push_nested(ast, depth);
        Ok(())
    }

    fn parse_decimal(&self) -> Result<u32, Error> {
        let start = self.offset();
        while !self.is_eof() && self.char().is_ascii_digit() {
            self.bump();
        }
        let digits = &self.pattern[start..self.offset()];
        if digits.is_empty() {
            return Err(
                self.error(start, ErrorKind::RepetitionCountDecimalEmpty)
            );
        }
        digits
            .parse::<u32>()
            .map_err(|_| self.error(start, ErrorKind::RepetitionCountOverflow))
    }

    /// Parse an escape sequence. The parser must be positioned at the
    /// backslash. On success, the parser is positioned immediately after the
    /// escape.
    fn parse_escape(&self) -> Result<Escape, Error> {
        let start = self.offset();
        if !self.bump() {
            return Err(self.error(start, ErrorKind::EscapeUnexpectedEof));
        }
        let c = self.char();
        self.bump();
        let perl = |class: PerlClass, negated: bool| {
            Ok(Escape::Class(ClassSet::perl(class, negated)))
        };
        match c {
            'd' => perl(PerlClass::Digit, false),
            'D' => perl(PerlClass::Digit, true),
            'w' => perl(PerlClass::Word, false),
            'W' => perl(PerlClass::Word, true),
            's' => perl(PerlClass::Space, false),
            'S' => perl(PerlClass::Space, true),
            't' => Ok(Escape::Code('\t' as u32)),
            'n' => Ok(Escape::Code('\n' as u32)),
            'r' => Ok(Escape::Code('\r' as u32)),
            'f' => Ok(Escape::Code('\x0C' as u32)),
            'v' => Ok(Escape::Code('\x0B' as u32)),
            'x' => self.parse_hex(start),
            '0' => Ok(Escape::Code(self.parse_octal())),
            '1'..='9' => Err(self.error(
                start,
                ErrorKind::Unsupported("backreferences"),
            )),
            'A' | 'z' | 'Z' | 'G' => {
                Err(self.error(start, ErrorKind::Unsupported("anchors")))
            }
            'b' | 'B' => Err(self.error(
                start,
                ErrorKind::Unsupported("word boundary assertions"),
            )),
            'p' | 'P' => Err(self.error(
                start,
                ErrorKind::Unsupported("Unicode classes"),
            )),
            c if c.is_ascii_punctuation() => Ok(Escape::Code(c as u32)),
            c => Err(self.error(start, ErrorKind::EscapeUnrecognized(c))),
        }
    }

    /// Parse `\xHH` or `\x{H...}`. The parser is positioned after the `x`.
    fn parse_hex(&self, start: usize) -> Result<Escape, Error> {
        if self.is_eof() {
            return Err(self.error(start, ErrorKind::EscapeUnexpectedEof));
        }
        let braced = self.bump_if('{');
        let digits_start = self.offset();
        let max_digits = if braced { 6 } else { 2 };
        while !self.is_eof()
            && self.char().is_ascii_hexdigit()
            && self.offset() - digits_start < max_digits
        {
            self.bump();
        }
        let digits = &self.pattern[digits_start..self.offset()];
        if braced {
            if self.is_eof() {
                return Err(self.error(start, ErrorKind::EscapeUnexpectedEof));
            }
            if digits.is_empty() || !self.bump_if('}') {
                return Err(self.error(start, ErrorKind::EscapeHexInvalid));
            }
        } else if digits.len() != 2 {
            if self.is_eof() {
                return Err(self.error(start, ErrorKind::EscapeUnexpectedEof));
            }
            return Err(self.error(start, ErrorKind::EscapeHexInvalid));
        }
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| self.error(start, ErrorKind::EscapeHexInvalid))?;
        if code > MAX_CHAR {
            return Err(self.error(start, ErrorKind::CodepointInvalid));
        }
        Ok(Escape::Code(code))
    }

    /// Parse up to three octal digits following `\0`. The value never
    /// exceeds `0o377`.
    fn parse_octal(&self) -> u32 {
        let mut code = 0;
        for _ in 0..3 {
            if self.is_eof() {
                break;
            }
            let digit = match self.char().to_digit(8) {
                Some(digit) => digit,
                None => break,
            };
            if code * 8 + digit > 0o377 {
                break;
            }
            code = code * 8 + digit;
            self.bump();
        }
        code
    }

    /// Parse a bracketed class. The parser must be positioned at the `[`.
    fn parse_class(&self) -> Result<Ast, Error> {
        let start = self.offset();
        let unclosed = || self.error(start, ErrorKind::ClassUnclosed);
        if !self.bump() {
            return Err(unclosed());
        }
        let negated = self.bump_if('^');
        let mut set = ClassSet::new();
        let mut members = 0;
        loop {
            if self.is_eof() {
                return Err(unclosed());
            }
            if self.bump_if(']') {
                break;
            }
            let atom_start = self.offset();
            let lo = self.parse_class_atom()?;
            let is_range = !self.is_eof()
                && self.char() == '-'
                && self.peek().map_or(false, |c| c != ']');
            match lo {
                ClassAtom::Class(_) if is_range => {
                    return Err(
                        self.error(atom_start, ErrorKind::ClassRangeInvalid)
                    );
                }
                ClassAtom::Class(class) => set.union(class),
                ClassAtom::Code(lo) if is_range => {
                    self.bump();
                    let hi = match self.parse_class_atom()? {
                        ClassAtom::Code(hi) if lo <= hi => hi,
                        _ => {
                            return Err(self.error(
                                atom_start,
                                ErrorKind::ClassRangeInvalid,
                            ));
                        }
                    };
                    set.push(CharRange::new(lo, hi));
                }
                ClassAtom::Code(lo) => set.push(CharRange::new(lo, lo)),
            }
            members += 1;
        }
        if members == 0 {
            return Err(self.error(start, ErrorKind::ClassEmpty));
        }
        if negated {
            set.negate();
        }
        set.into_ast().ok_or_else(|| self.error(start, ErrorKind::ClassEmpty))
    }

    fn parse_class_atom(&self) -> Result<ClassAtom, Error> {
        if self.is_eof() {
            return Err(self.error(self.offset(), ErrorKind::ClassUnclosed));
        }
        let c = self.char();
        if c != '\\' {
            self.bump();
            return Ok(ClassAtom::Code(c as u32));
        }
        match self.parse_escape()? {
            Escape::Code(code) => Ok(ClassAtom::Code(code)),
            Escape::Class(set) => Ok(ClassAtom::Class(set)),
        }
    }
}
