//! Bounded-lookahead buffering over a [`GraphQLTokenSource`].

use crate::token::GraphQLToken;
use crate::token::GraphQLTokenKind;
use crate::token_source::GraphQLTokenSource;
use std::collections::VecDeque;

/// Wraps a [`GraphQLTokenSource`] with `peek`/`peek_nth` lookahead.
///
/// Unconsumed tokens sit in a ring buffer; `consume()` pops from the front.
/// The parser never needs more than two tokens of lookahead.
pub struct GraphQLTokenStream<'src, TTokenSource: GraphQLTokenSource<'src>> {
    token_source: TTokenSource,
    buffer: VecDeque<GraphQLToken<'src>>,
}

impl<'src, TTokenSource: GraphQLTokenSource<'src>> GraphQLTokenStream<'src, TTokenSource> {
    pub fn new(token_source: TTokenSource) -> Self {
        Self {
            token_source,
            buffer: VecDeque::new(),
        }
    }

    /// Advances past the next token and returns it.
    pub fn consume(&mut self) -> Option<GraphQLToken<'src>> {
        self.ensure_buffer_has(1);
        self.buffer.pop_front()
    }

    pub fn current_buffer_len(&self) -> usize {
        self.buffer.len()
    }

    fn ensure_buffer_has(&mut self, count: usize) {
        while self.buffer.len() < count {
            match self.token_source.next() {
                Some(token) => self.buffer.push_back(token),
                None => break,
            }
        }
    }

    /// `true` once the next token is `Eof` or the source is exhausted.
    pub fn is_at_end(&mut self) -> bool {
        self.peek()
            .is_none_or(|token| matches!(token.kind, GraphQLTokenKind::Eof))
    }

    #[inline]
    pub fn peek(&mut self) -> Option<&GraphQLToken<'src>> {
        self.peek_nth(0)
    }

    /// Peeks `n` tokens ahead; `peek_nth(0)` is `peek()`.
    pub fn peek_nth(&mut self, n: usize) -> Option<&GraphQLToken<'src>> {
        self.ensure_buffer_has(n + 1);
        self.buffer.get(n)
    }
}
