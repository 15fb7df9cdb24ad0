use std::ops::Range;

use log::{debug, warn};

use crate::errors::{Error, Result};
use crate::parser::{
    find, find_block_end, find_opening, parse_condition, parse_foreach, read_tag, Condition, Tag,
    ELSE, ENDFOR, ENDIF, FOREACH, IF, TAG_START, VARIABLE_END, VARIABLE_START,
};
use crate::renderer::environment::Environment;
use crate::value::Value;

/// Renders one template text in a single forward pass.
///
/// There is no separate parse step: blocks are matched when the scan reaches them,
/// so a malformed statement inside a branch that isn't taken goes unnoticed.
pub struct Processor<'a> {
    text: &'a str,
    env: &'a mut Environment,
    strict_conditions: bool,
}

impl<'a> Processor<'a> {
    /// Create a new `Processor`
    pub fn new(text: &'a str, env: &'a mut Environment, strict_conditions: bool) -> Processor<'a> {
        Processor { text, env, strict_conditions }
    }

    /// Renders the whole text
    pub fn render(&mut self) -> Result<String> {
        let mut output = String::with_capacity(self.text.len());
        self.render_range(0..self.text.len(), &mut output)?;
        Ok(output)
    }

    fn render_range(&mut self, range: Range<usize>, output: &mut String) -> Result<()> {
        let text = self.text;
        let mut cursor = range.start;

        while cursor < range.end {
            let start = match find_opening(text, cursor..range.end) {
                Some(start) => start,
                None => {
                    output.push_str(&text[cursor..range.end]);
                    break;
                }
            };
            output.push_str(&text[cursor..start]);

            cursor = if text[start..].starts_with(VARIABLE_START) {
                self.render_variable(start, range.end, output)?
            } else {
                self.render_tag(start, range.end, output)?
            };
        }

        Ok(())
    }

    /// Returns the offset right after the closing `}}`
    fn render_variable(
        &mut self,
        start: usize,
        limit: usize,
        output: &mut String,
    ) -> Result<usize> {
        let text = self.text;
        let inner = start + VARIABLE_START.len();
        let close = find(text, inner..limit, VARIABLE_END).ok_or_else(|| {
            Error::syntax(format!("expected `{}`", VARIABLE_END), &text[start..limit])
        })?;

        output.push_str(&self.env.display_string(&text[inner..close]));
        Ok(close + VARIABLE_END.len())
    }

    /// Returns the offset where the scan resumes
    fn render_tag(&mut self, start: usize, limit: usize, output: &mut String) -> Result<usize> {
        let text = self.text;
        let tag = read_tag(text, start, limit).ok_or_else(|| {
            Error::syntax(format!("expected `%}}` to close `{}`", TAG_START), &text[start..limit])
        })?;

        match tag.keyword {
            FOREACH => self.render_foreach(&tag, limit, output),
            IF => self.render_if(&tag, limit, output),
            keyword => {
                // The rest of the statement is kept as plain text
                warn!("Unknown directive `{}` ignored", keyword);
                Ok(tag.keyword_end)
            }
        }
    }

    fn render_foreach(
        &mut self,
        tag: &Tag<'a>,
        limit: usize,
        output: &mut String,
    ) -> Result<usize> {
        let text = self.text;
        let header = parse_foreach(&text[tag.header.clone()]).map_err(|e| {
            let message = format!("invalid `{}` statement\n{}", FOREACH, e);
            Error::syntax(message, &text[tag.start..limit])
        })?;
        let block = find_block_end(text, tag.end, limit, FOREACH, ENDFOR, None).ok_or_else(|| {
            Error::syntax(format!("missing `{{% {} %}}`", ENDFOR), &text[tag.start..limit])
        })?;
        let body = tag.end..block.end_tag_start;

        let items = match self.env.resolve(header.source).and_then(Value::into_iterable) {
            Some(items) => items,
            None => {
                debug!("`{}` is not iterable, skipping the loop", header.source);
                Vec::new()
            }
        };

        for item in items {
            self.env.push_local(header.name, item.clone());
            let rendered = self.render_range(body.clone(), output);
            self.env.pop_local(header.name, &item);
            rendered?;
        }

        Ok(block.end)
    }

    fn render_if(&mut self, tag: &Tag<'a>, limit: usize, output: &mut String) -> Result<usize> {
        let text = self.text;
        let condition = parse_condition(&text[tag.header.clone()]).map_err(|e| {
            Error::syntax(format!("invalid `{}` statement\n{}", IF, e), &text[tag.start..limit])
        })?;
        let block = find_block_end(text, tag.end, limit, IF, ENDIF, Some(ELSE)).ok_or_else(|| {
            Error::syntax(format!("missing `{{% {} %}}`", ENDIF), &text[tag.start..limit])
        })?;

        let (then_range, else_range) = match block.else_tag {
            Some(ref else_tag) => {
                (tag.end..else_tag.start, Some(else_tag.end..block.end_tag_start))
            }
            None => (tag.end..block.end_tag_start, None),
        };

        if self.evaluate(&condition)? {
            self.render_range(then_range, output)?;
        } else if let Some(else_range) = else_range {
            self.render_range(else_range, output)?;
        }

        Ok(block.end)
    }

    fn evaluate(&mut self, condition: &Condition<'_>) -> Result<bool> {
        let left = match self.env.resolve(condition.path) {
            Some(left) => left,
            None => {
                warn!(
                    "`{}` is not defined, condition `{} {} {}` is false",
                    condition.path, condition.path, condition.op, condition.literal
                );
                return Ok(false);
            }
        };

        match left.compare_literal(condition.literal) {
            Ok(Some(ordering)) => Ok(condition.op.holds(ordering)),
            Ok(None) => {
                warn!(
                    "`{}` is {} and can't be compared, condition `{} {} {}` is false",
                    condition.path,
                    left.kind(),
                    condition.path,
                    condition.op,
                    condition.literal
                );
                Ok(false)
            }
            Err(e) if self.strict_conditions => Err(e),
            Err(e) => {
                warn!(
                    "{}, condition `{} {} {}` is false",
                    e, condition.path, condition.op, condition.literal
                );
                Ok(false)
            }
        }
    }
}
