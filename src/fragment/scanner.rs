//! Hash fragment scanner: tokenizer and transition table

use std::iter::Peekable;
use std::str::Chars;

/// Scanner mode. `keyed` records whether the current pair already has an
/// explicit key, after which colons are plain value content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    ReadingKey,
    ReadingValue { keyed: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Symbol {
    Open,
    Close,
    Separator,
    Colon,
    End,
    Char(char),
}

impl Symbol {
    fn push_onto(self, buffer: &mut String) {
        match self {
            Symbol::Open => buffer.push('('),
            Symbol::Close => buffer.push(')'),
            Symbol::Separator => buffer.push_str("//"),
            Symbol::Colon => buffer.push(':'),
            Symbol::End => {}
            Symbol::Char(c) => buffer.push(c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    PushKey,
    BeginValue,
    PushValue,
    Descend,
    Ascend,
    PromoteKey,
    Commit,
    Finish,
    Abandon,
}

/// Transition table. `nested` is true while inside parentheses.
pub(crate) fn transition(mode: Mode, nested: bool, symbol: Symbol) -> (Action, Mode) {
    use Action::*;

    match (mode, symbol) {
        (Mode::ReadingKey, Symbol::Colon) => (BeginValue, Mode::ReadingValue { keyed: true }),
        (Mode::ReadingKey, Symbol::End) => (Abandon, mode),
        (Mode::ReadingKey, _) => (PushKey, mode),
        (Mode::ReadingValue { .. }, Symbol::Open) => (Descend, mode),
        (Mode::ReadingValue { .. }, Symbol::Close) => (Ascend, mode),
        (Mode::ReadingValue { .. }, Symbol::End) => (Finish, mode),
        (Mode::ReadingValue { .. }, _) if nested => (PushValue, mode),
        (Mode::ReadingValue { .. }, Symbol::Separator) => (Commit, Mode::ReadingKey),
        (Mode::ReadingValue { keyed: false }, Symbol::Colon) => {
            (PromoteKey, Mode::ReadingValue { keyed: true })
        }
        (Mode::ReadingValue { .. }, Symbol::Colon | Symbol::Char(_)) => (PushValue, mode),
    }
}

/// Splits input into symbols, with a trailing `End`.
pub(crate) struct Symbols<'a> {
    chars: Peekable<Chars<'a>>,
    done: bool,
}

impl<'a> Symbols<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            done: false,
        }
    }
}

impl Iterator for Symbols<'_> {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        if self.done {
            return None;
        }
        let symbol = match self.chars.next() {
            None => {
                self.done = true;
                Symbol::End
            }
            Some('(') => Symbol::Open,
            Some(')') => Symbol::Close,
            Some(':') => Symbol::Colon,
            Some('/') if self.chars.peek() == Some(&'/') => {
                self.chars.next();
                Symbol::Separator
            }
            Some(c) => Symbol::Char(c),
        };
        Some(symbol)
    }
}

/// Mutable scan state driven by [`transition`].
pub(crate) struct Scanner {
    mode: Mode,
    depth: usize,
    key: String,
    value: String,
    pairs: Vec<(String, String)>,
}

impl Scanner {
    pub(crate) fn new(default_key: &str) -> Self {
        Self {
            mode: Mode::ReadingValue { keyed: false },
            depth: 0,
            key: default_key.to_string(),
            value: String::new(),
            pairs: Vec::new(),
        }
    }

    /// Feeds one symbol. Returns false once the scan is over.
    pub(crate) fn feed(&mut self, symbol: Symbol) -> bool {
        let (action, next) = transition(self.mode, self.depth > 0, symbol);
        self.mode = next;
        match action {
            Action::PushKey => symbol.push_onto(&mut self.key),
            Action::BeginValue => self.value.clear(),
            Action::PushValue => symbol.push_onto(&mut self.value),
            Action::Descend => {
                symbol.push_onto(&mut self.value);
                self.depth += 1;
            }
            Action::Ascend => {
                symbol.push_onto(&mut self.value);
                self.depth = self.depth.saturating_sub(1);
            }
            Action::PromoteKey => self.key = std::mem::take(&mut self.value),
            Action::Commit => self.commit(),
            Action::Finish => {
                self.commit();
                return false;
            }
            Action::Abandon => return false,
        }
        true
    }

    fn commit(&mut self) {
        let key = std::mem::take(&mut self.key);
        let value = std::mem::take(&mut self.value);
        self.depth = 0;
        self.pairs.push((key, value));
    }

    pub(crate) fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}
