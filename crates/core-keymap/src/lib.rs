//! core-keymap: key combinator for multi-key sequences and repeat counts.
//!
//! Each keypress becomes a [`KeyToken`]. Tokens accumulate in a bounded
//! [`KeyChain`] until a reducer recognizes a complete command and pops the
//! tokens it consumed. Two adjacent bare digit tokens fuse into one token
//! carrying a multi-digit count, so `1` `2` `j` arrives at the reducer as the
//! two tokens `12`, `j` without any lookahead.
//!
//! Design notes:
//! - The chain is a short buffer matched from its newest end; there are no
//!   back-links between tokens.
//! - Overflow drops the oldest tokens so unrecognized input cannot grow the
//!   chain without bound.
//! - No side effects besides TRACE/DEBUG logging on target `input.chain`.

use core_events::{KeyCode, KeyEvent};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, trace};

/// Largest repeat count a fused digit token will carry.
pub const MAX_COUNT: u32 = 999_999;

/// Combinator contract violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("cannot combine key `{left}` with `{right}`")]
    CannotCombine { left: String, right: String },
}

/// One normalized keypress, or a run of fused digit keypresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyToken {
    label: String,
    number: Option<u32>,
    ctrl: bool,
    shift: bool,
}

impl KeyToken {
    /// Normalize a key event. SHIFT upper-cases character labels; digit
    /// characters also carry their numeric value.
    pub fn from_event(event: &KeyEvent) -> Self {
        let shift = event.shift_held();
        let (label, number) = match &event.code {
            KeyCode::Char(c) => {
                let label = if shift {
                    c.to_uppercase().collect()
                } else {
                    c.to_string()
                };
                (label, c.to_digit(10))
            }
            other => (other.label(), None),
        };
        Self {
            label,
            number,
            ctrl: event.ctrl_held(),
            shift,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn ctrl(&self) -> bool {
        self.ctrl
    }

    pub fn shift(&self) -> bool {
        self.shift
    }

    /// True for the key `label` pressed without CTRL.
    pub fn is(&self, label: &str) -> bool {
        !self.ctrl && self.label == label
    }

    /// True for `label` pressed with CTRL.
    pub fn is_ctrl(&self, label: &str) -> bool {
        self.ctrl && self.label == label
    }

    /// The single character this token stands for, if its label is one char.
    pub fn as_char(&self) -> Option<char> {
        let mut chars = self.label.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    /// Both tokens are digit runs and neither carries a modifier.
    pub fn can_combine(&self, other: &KeyToken) -> bool {
        self.number.is_some()
            && other.number.is_some()
            && !self.ctrl
            && !self.shift
            && !other.ctrl
            && !other.shift
    }

    /// Append `other`'s digits to this token and re-derive the count.
    pub fn combine(&mut self, other: &KeyToken) -> Result<(), KeyError> {
        if !self.can_combine(other) {
            return Err(KeyError::CannotCombine {
                left: self.label.clone(),
                right: other.label.clone(),
            });
        }
        self.label.push_str(&other.label);
        let value = self
            .label
            .chars()
            .filter_map(|c| c.to_digit(10))
            .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d))
            .min(MAX_COUNT);
        self.number = Some(value);
        Ok(())
    }
}

/// Pending key tokens, oldest first.
#[derive(Debug, Clone)]
pub struct KeyChain {
    tokens: SmallVec<[KeyToken; 4]>,
    limit: usize,
}

impl Default for KeyChain {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyChain {
    pub const DEFAULT_LIMIT: usize = 32;
    /// Room for a count plus a two-key command (`2dd`, `3gg`).
    pub const MIN_LIMIT: usize = 3;

    pub fn new() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }

    /// Chain holding at most `limit` tokens, never fewer than [`Self::MIN_LIMIT`].
    pub fn with_limit(limit: usize) -> Self {
        Self {
            tokens: SmallVec::new(),
            limit: limit.max(Self::MIN_LIMIT),
        }
    }

    /// Add a token, fusing it into the newest token when both are bare digits.
    pub fn push(&mut self, token: KeyToken) {
        if let Some(last) = self.tokens.last_mut()
            && last.can_combine(&token)
        {
            match last.combine(&token) {
                Ok(()) => {
                    trace!(target: "input.chain", label = last.label(), count = ?last.number(), "digits_fused");
                    return;
                }
                Err(err) => debug!(target: "input.chain", %err, "fuse_rejected"),
            }
        }
        trace!(target: "input.chain", label = token.label(), depth = self.tokens.len() + 1, "push");
        self.tokens.push(token);
        if self.tokens.len() > self.limit {
            let excess = self.tokens.len() - self.limit;
            self.tokens.drain(..excess);
            debug!(target: "input.chain", dropped = excess, "overflow_trim");
        }
    }

    /// Token `n` places back from the newest (`0` is the newest).
    pub fn back(&self, n: usize) -> Option<&KeyToken> {
        self.tokens
            .len()
            .checked_sub(n + 1)
            .and_then(|i| self.tokens.get(i))
    }

    pub fn last(&self) -> Option<&KeyToken> {
        self.back(0)
    }

    /// Numeric value of the token `n` places back, if it is a digit run.
    pub fn number_at(&self, n: usize) -> Option<u32> {
        self.back(n).and_then(KeyToken::number)
    }

    /// Remove the newest `n` tokens.
    pub fn pop(&mut self, n: usize) {
        let keep = self.tokens.len().saturating_sub(n);
        self.tokens.truncate(keep);
        trace!(target: "input.chain", popped = n, depth = keep, "pop");
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Labels of the pending tokens, oldest first.
    pub fn labels(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.label.clone()).collect()
    }
}

/// Repeat count carried by an optional count token; zero or absent means one.
pub fn count_or_one(number: Option<u32>) -> u32 {
    number.filter(|n| *n > 0).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyModifiers, parse_notation};
    use pretty_assertions::assert_eq;

    fn feed(seq: &str) -> KeyChain {
        let mut chain = KeyChain::new();
        for ev in parse_notation(seq).unwrap() {
            chain.push(KeyToken::from_event(&ev));
        }
        chain
    }

    fn tok(c: char) -> KeyToken {
        KeyToken::from_event(&KeyEvent::char(c))
    }

    #[test]
    fn digits_fuse_into_count() {
        let chain = feed("12");
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.last().unwrap().label(), "12");
        assert_eq!(chain.number_at(0), Some(12));
    }

    #[test]
    fn digit_then_motion_stays_chained() {
        let chain = feed("1j");
        assert_eq!(chain.labels(), vec!["1", "j"]);
        assert_eq!(chain.number_at(1), Some(1));
    }

    #[test]
    fn digits_after_non_digit_start_new_run() {
        let chain = feed("5x23");
        assert_eq!(chain.labels(), vec!["5", "x", "23"]);
        assert_eq!(chain.number_at(0), Some(23));
    }

    #[test]
    fn shift_uppercases_and_blocks_fusion() {
        let shifted = KeyToken::from_event(&KeyEvent::new(
            KeyCode::Char('g'),
            KeyModifiers::SHIFT,
        ));
        assert_eq!(shifted.label(), "G");
        assert!(shifted.shift());

        let mut chain = KeyChain::new();
        chain.push(tok('1'));
        chain.push(KeyToken::from_event(&KeyEvent::new(
            KeyCode::Char('2'),
            KeyModifiers::SHIFT,
        )));
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn combine_rejects_modified_tokens() {
        let mut a = tok('1');
        let ctrl_two = KeyToken::from_event(&KeyEvent::ctrl('2'));
        assert_eq!(
            a.combine(&ctrl_two),
            Err(KeyError::CannotCombine {
                left: "1".into(),
                right: "2".into()
            })
        );
        assert_eq!(a.number(), Some(1));
        let mut x = tok('x');
        assert!(x.combine(&tok('3')).is_err());
    }

    #[test]
    fn count_saturates() {
        let chain = feed("99999999");
        assert_eq!(chain.number_at(0), Some(MAX_COUNT));
    }

    #[test]
    fn pop_and_back_indexing() {
        let mut chain = feed("3gg");
        assert_eq!(chain.back(2).unwrap().label(), "3");
        assert!(chain.back(3).is_none());
        chain.pop(2);
        assert_eq!(chain.labels(), vec!["3"]);
        chain.pop(5);
        assert!(chain.is_empty());
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut chain = KeyChain::with_limit(3);
        for c in ['a', 'b', 'c', 'd'] {
            chain.push(tok(c));
        }
        assert_eq!(chain.labels(), vec!["b", "c", "d"]);
    }

    #[test]
    fn small_limit_still_fits_counted_command() {
        let mut chain = KeyChain::with_limit(1);
        for ev in parse_notation("q2dd").unwrap() {
            chain.push(KeyToken::from_event(&ev));
        }
        assert_eq!(chain.labels(), vec!["2", "d", "d"]);
        assert_eq!(chain.number_at(2), Some(2));
    }

    #[test]
    fn named_keys_use_host_labels() {
        let chain = feed("<Esc><Left>");
        assert_eq!(chain.labels(), vec!["Escape", "ArrowLeft"]);
        assert!(chain.last().unwrap().as_char().is_none());
    }

    #[test]
    fn ctrl_matching_is_explicit() {
        let r = KeyToken::from_event(&KeyEvent::ctrl('r'));
        assert!(r.is_ctrl("r"));
        assert!(!r.is("r"));
        assert!(tok('r').is("r"));
    }

    #[test]
    fn zero_count_means_one() {
        assert_eq!(count_or_one(None), 1);
        assert_eq!(count_or_one(Some(0)), 1);
        assert_eq!(count_or_one(Some(7)), 7);
    }
}
