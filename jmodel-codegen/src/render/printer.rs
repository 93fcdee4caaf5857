//! Second pass: emit source text.

use jmodel_core::{Indent, LineSeparator, is_identifier_part};

use super::formatter::{CLOSE_TYPE_ARGS, TokenSink};
use super::resolve::Resolution;
use crate::model::{ClassId, CodeModel};

/// Whether a space goes between a token ending in `prev` and one starting
/// with `next`.
pub(crate) fn need_space(prev: char, next: char) -> bool {
    if prev.is_whitespace() || next.is_whitespace() {
        return false;
    }
    if prev == CLOSE_TYPE_ARGS {
        // "List<String> names" but "new ArrayList<String>()"
        return !matches!(
            next,
            '(' | ')' | ',' | ';' | '.' | '[' | ']' | CLOSE_TYPE_ARGS
        );
    }
    if next == CLOSE_TYPE_ARGS {
        return false;
    }
    // "- -1" must not fuse into a decrement
    if matches!((prev, next), ('-', '-') | ('+', '+')) {
        return true;
    }
    if matches!(prev, ',' | '=' | ';') || next == '=' {
        return true;
    }
    if matches!(prev, ')' | ']') && next == '{' {
        return true;
    }
    let prev_ident = is_identifier_part(prev);
    let next_ident = is_identifier_part(next);
    if prev_ident {
        return next_ident || matches!(next, '{' | '@' | '"' | '\'');
    }
    next_ident && matches!(prev, ')' | ']' | '}' | '?' | '"' | '\'')
}

/// Sink that writes text, spelling class references according to a
/// [`Resolution`].
pub struct Printer<'r> {
    resolution: &'r Resolution,
    indent: String,
    line_separator: &'static str,
    depth: i32,
    at_line_start: bool,
    last: Option<char>,
    out: String,
}

impl<'r> Printer<'r> {
    pub fn new(resolution: &'r Resolution, indent: &Indent, line_separator: LineSeparator) -> Self {
        Self {
            resolution,
            indent: indent.unit().into_owned(),
            line_separator: line_separator.as_str(),
            depth: 0,
            at_line_start: true,
            last: None,
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn write(&mut self, text: &str) {
        let Some(first) = text.chars().next() else {
            return;
        };
        if self.at_line_start {
            for _ in 0..self.depth.max(0) {
                self.out.push_str(&self.indent);
            }
            self.at_line_start = false;
        } else if let Some(last) = self.last {
            if need_space(last, first) {
                self.out.push(' ');
            }
        }
        if text.contains(CLOSE_TYPE_ARGS) {
            self.out.push_str(&text.replace(CLOSE_TYPE_ARGS, ">"));
        } else {
            self.out.push_str(text);
        }
        self.last = text.chars().next_back();
    }
}

impl TokenSink for Printer<'_> {
    fn text(&mut self, text: &str) {
        self.write(text);
    }

    fn newline(&mut self) {
        self.out.push_str(self.line_separator);
        self.at_line_start = true;
        self.last = None;
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn outdent(&mut self) {
        self.depth -= 1;
    }

    fn reference(&mut self, model: &CodeModel, id: ClassId) {
        let class = model.class(id);
        if self.resolution.is_visible(id) || class.is_error() {
            self.write(class.name());
            return;
        }
        match class.outer() {
            Some(outer) => {
                self.reference(model, outer);
                self.write(".");
                self.write(class.name());
            }
            None => self.write(&model.full_name(id)),
        }
    }
}
