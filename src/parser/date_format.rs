//! ULDML date pattern lexing and conversion to C89 `strftime` directives
//!
//! A pattern such as `yyyy-MM-dd'T'HH:mm` is lexed into runs of one repeated letter
//! (fields) and literal text, then fields are looked up in a fixed table. Fields without
//! a C89 equivalent are copied through unchanged.

use std::iter::FusedIterator;

/// Kind of a lexed pattern token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    /// Literal text, copied with `%` escaped
    Text,
    /// A run of one repeated letter, e.g. `yyyy`
    Field,
}

/// A token of a ULDML date pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub opcode: OpCode,
    pub text: String,
}

impl Token {
    fn text(text: String) -> Self {
        Self {
            opcode: OpCode::Text,
            text,
        }
    }

    fn field(text: String) -> Self {
        Self {
            opcode: OpCode::Field,
            text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    OpenText,
    InField,
    InText,
    MaybeCloseText,
    Done,
}

/// Sentinel appended to the pattern so the last run is flushed
const END: char = '\0';

/// Lexer over a ULDML date pattern, yielding [`Token`]s once
pub struct DateFormatLexer {
    chars: Vec<char>,
    pos: usize,
    previous: Option<char>,
    current: String,
    state: State,
}

impl DateFormatLexer {
    pub fn new(pattern: &str) -> Self {
        let mut chars: Vec<char> = pattern.chars().collect();
        chars.push(END);
        Self {
            chars,
            pos: 0,
            previous: None,
            current: String::new(),
            state: State::Start,
        }
    }

    fn take_current(&mut self) -> String {
        std::mem::take(&mut self.current)
    }
}

impl Iterator for DateFormatLexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.state != State::Done {
            let Some(&c) = self.chars.get(self.pos) else {
                self.state = State::Done;
                break;
            };
            let previous = self.previous.replace(c);
            self.pos += 1;

            match self.state {
                State::Start => {
                    if c == END {
                        self.state = State::Done;
                    } else if c == '\'' {
                        self.state = State::OpenText;
                    } else {
                        self.current.push(c);
                        self.state = State::InField;
                    }
                }
                State::OpenText => {
                    if c == '\'' {
                        self.state = State::Start;
                        return Some(Token::text("'".to_string()));
                    }
                    if c == END {
                        self.state = State::Done;
                    } else {
                        self.current.push(c);
                        self.state = State::InText;
                    }
                }
                State::InField => {
                    if Some(c) == previous {
                        self.current.push(c);
                    } else {
                        // re-examine `c` from the start state
                        self.pos -= 1;
                        self.state = State::Start;
                        let run = self.take_current();
                        return Some(if run.chars().all(char::is_alphabetic) {
                            Token::field(run)
                        } else {
                            Token::text(run)
                        });
                    }
                }
                State::InText => {
                    if c == '\'' {
                        self.state = State::MaybeCloseText;
                    } else if c == END {
                        // unterminated literal runs to the end of the pattern
                        self.state = State::Done;
                        return Some(Token::text(self.take_current()));
                    } else {
                        self.current.push(c);
                    }
                }
                State::MaybeCloseText => {
                    if c == '\'' {
                        self.current.push(c);
                        self.state = State::InText;
                    } else {
                        self.pos -= 1;
                        self.state = State::Start;
                        return Some(Token::text(self.take_current()));
                    }
                }
                State::Done => unreachable!("loop exits on Done"),
            }
        }
        None
    }
}

impl FusedIterator for DateFormatLexer {}

/// Lex a ULDML date pattern
pub fn lex_date_format(pattern: &str) -> DateFormatLexer {
    DateFormatLexer::new(pattern)
}

/// C89 directive for a field run, if one exists
pub fn c89_directive(field: &str) -> Option<&'static str> {
    let mut chars = field.chars();
    let letter = chars.next()?;
    if !chars.all(|c| c == letter) {
        return None;
    }
    let count = field.chars().count();

    match (letter, count) {
        ('y' | 'Y', 2) => Some("%y"),
        ('y' | 'Y', 1..=5) => Some("%Y"),
        ('M', 1..=2) => Some("%m"),
        ('M', 3) => Some("%b"),
        ('M', 4) => Some("%B"),
        ('w', 1..=3) => Some("%W"),
        ('D', 1..=3) => Some("%j"),
        ('d', 1..=2) => Some("%d"),
        ('E', 1..=3) => Some("%a"),
        ('E', 4..=6) => Some("%A"),
        ('u', 1) => Some("%u"),
        ('a', 1..=4) => Some("%p"),
        ('H', 1..=2) => Some("%H"),
        ('h', 1..=2) => Some("%I"),
        ('m', 1..=2) => Some("%M"),
        ('s', 1..=2) => Some("%S"),
        ('S', 1..=19) => Some("%f"),
        ('z', 1..=4) => Some("%Z"),
        ('Z' | 'X', 1..=5) => Some("%Z"),
        // era, week in month, day of week in month, 1-24 and 0-11 hours
        _ => None,
    }
}

/// Convert a ULDML date pattern into a C89 `strftime` format
///
/// # Examples
/// ```
/// use meta_csv::parser::convert_date_format;
///
/// assert_eq!(convert_date_format("yyyy-MM-dd"), "%Y-%m-%d");
/// assert_eq!(convert_date_format("dd'%'MM"), "%d%%%m");
/// ```
pub fn convert_date_format(pattern: &str) -> String {
    let mut format = String::new();
    for token in lex_date_format(pattern) {
        match token.opcode {
            OpCode::Text => format.push_str(&token.text.replace('%', "%%")),
            OpCode::Field => match c89_directive(&token.text) {
                Some(directive) => format.push_str(directive),
                None => {
                    tracing::debug!(field = %token.text, "no C89 directive for date field");
                    format.push_str(&token.text);
                }
            },
        }
    }
    format
}
