//! # Message Log
//!
//! Bounded, append-only log of coloured lines. Long messages are wrapped to
//! the configured width before insertion, so one logical message may occupy
//! several lines, and each line is evicted independently, oldest first.

use crate::game::Rgb;
use crate::{DelverError, DelverResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A line of text with a display colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub color: Rgb,
}

impl Message {
    /// Creates a message with the given colour.
    pub fn new(text: impl Into<String>, color: Rgb) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }

    /// Creates a white message.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Rgb::WHITE)
    }
}

/// The in-game message log.
///
/// # Examples
///
/// ```
/// use delver::{Message, MessageLog};
///
/// let mut log = MessageLog::new(10, 2).unwrap();
/// log.add_message(Message::plain("a long line of text"));
/// assert_eq!(log.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageLog {
    messages: VecDeque<Message>,
    width: usize,
    height: usize,
}

impl MessageLog {
    /// Creates an empty log that wraps at `width` characters and keeps
    /// `height` lines.
    pub fn new(width: usize, height: usize) -> DelverResult<Self> {
        if width == 0 || height == 0 {
            return Err(DelverError::Configuration(format!(
                "message log needs a non-zero size, got {width}x{height}"
            )));
        }
        Ok(Self {
            messages: VecDeque::with_capacity(height),
            width,
            height,
        })
    }

    /// Wraps and appends a message, evicting the oldest lines when full.
    pub fn add_message(&mut self, message: Message) {
        log::debug!("log: {}", message.text);
        for line in textwrap::wrap(&message.text, self.width) {
            if self.messages.len() == self.height {
                self.messages.pop_front();
            }
            self.messages.push_back(Message::new(line.into_owned(), message.color));
        }
    }

    /// Iterates the retained lines, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Number of retained lines.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent line, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

/// Upper-cases the first character, for sentences that start with a name.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
