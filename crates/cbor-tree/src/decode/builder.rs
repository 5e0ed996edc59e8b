//! Frame stack which assembles events into a [`Value`] tree.
//!
//! Every open container owns its in-progress value. When a frame completes,
//! the finished value is pushed into the parent like any other value, so the
//! parent's remaining count is decremented exactly once per child. Completed
//! ancestors are closed in a loop, which keeps memory use at O(depth).

use core::mem;

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{boxed::Box, collections::BTreeMap, string::String, vec::Vec};
#[cfg(feature = "std")]
use std::{boxed::Box, collections::BTreeMap, string::String, vec::Vec};

use tracing::trace;

use crate::{
    error::{Error, ErrorKind, Result},
    tag::{Num, Tag},
    value::Value,
};

const MAX_PREALLOC_BYTES: usize = 1024 * 1024;

/// Bounds preallocation for a declared length which is not yet backed by
/// input.
#[inline]
fn cautious<T>(len: usize) -> usize {
    len.min(MAX_PREALLOC_BYTES / mem::size_of::<T>().max(1))
}

/// Kind of frame to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameKind {
    Array,
    /// Opens as a string-keyed object and is promoted to a general map on the
    /// first non-text key.
    Map,
    Tag(Num),
    ByteChunks,
    TextChunks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Remaining {
    Exact(usize),
    Indefinite,
}

impl Remaining {
    /// Counts one child and returns true when no more are expected.
    #[inline]
    fn count(&mut self) -> bool {
        match self {
            Remaining::Exact(n) => {
                *n = n.saturating_sub(1);
                *n == 0
            }
            Remaining::Indefinite => false,
        }
    }
}

#[derive(Debug)]
enum Container {
    Array(Vec<Value>),
    Object {
        entries: BTreeMap<String, Value>,
        pending_key: Option<String>,
    },
    Map {
        entries: BTreeMap<Value, Value>,
        pending_key: Option<Value>,
    },
    ByteChunks(Vec<u8>),
    TextChunks(String),
}

impl Container {
    fn has_pending_key(&self) -> bool {
        match self {
            Container::Object { pending_key, .. } => pending_key.is_some(),
            Container::Map { pending_key, .. } => pending_key.is_some(),
            _ => false,
        }
    }

    fn is_chunks(&self) -> bool {
        matches!(self, Container::ByteChunks(_) | Container::TextChunks(_))
    }

    /// Builds the general map which replaces a string-keyed object when a
    /// non-text key arrives. The key becomes the pending key of the map.
    fn promoted(entries: BTreeMap<String, Value>, key: Value) -> Container {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (Value::TextStr(k), v))
            .collect::<BTreeMap<_, _>>();
        trace!(len = entries.len(), "promoting object to map");
        Container::Map {
            entries,
            pending_key: Some(key),
        }
    }

    /// Adds a value and returns true if it completed a child (an element or
    /// a key/value entry).
    fn accept(&mut self, value: Value) -> Result<bool> {
        match self {
            Container::Array(items) => {
                items.push(value);
                Ok(true)
            }
            Container::Object {
                entries,
                pending_key,
            } => match pending_key.take() {
                Some(key) => {
                    entries.insert(key, value);
                    Ok(true)
                }
                None => match value.into_text_str() {
                    Ok(key) => {
                        *pending_key = Some(key);
                        Ok(false)
                    }
                    Err(key) => {
                        let entries = mem::take(entries);
                        *self = Container::promoted(entries, key);
                        Ok(false)
                    }
                },
            },
            Container::Map {
                entries,
                pending_key,
            } => match pending_key.take() {
                Some(key) => {
                    entries.insert(key, value);
                    Ok(true)
                }
                None => {
                    *pending_key = Some(value);
                    Ok(false)
                }
            },
            Container::ByteChunks(buf) => {
                let chunk = value
                    .into_byte_str()
                    .map_err(|_| Error::with_kind(ErrorKind::InvalidChunk))?;
                buf.extend_from_slice(&chunk);
                Ok(false)
            }
            Container::TextChunks(buf) => {
                let chunk = value
                    .into_text_str()
                    .map_err(|_| Error::with_kind(ErrorKind::InvalidChunk))?;
                buf.push_str(&chunk);
                Ok(false)
            }
        }
    }

    fn into_value(self) -> Value {
        match self {
            Container::Array(items) => Value::Array(items),
            Container::Object { entries, .. } => Value::Object(entries),
            Container::Map { entries, .. } => Value::Map(entries),
            Container::ByteChunks(buf) => Value::ByteStr(buf),
            Container::TextChunks(buf) => Value::TextStr(buf),
        }
    }
}

#[derive(Debug)]
enum Frame {
    Open {
        container: Container,
        remaining: Remaining,
    },
    /// A tag always wraps exactly one value.
    Tag(Num),
}

/// Stack of open frames on top of an indefinite root array.
#[derive(Debug)]
pub(crate) struct Builder {
    stack: Vec<Frame>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            stack: Vec::from([Self::root()]),
        }
    }

    fn root() -> Frame {
        Frame::Open {
            container: Container::Array(Vec::new()),
            remaining: Remaining::Indefinite,
        }
    }

    /// Number of frames including the root.
    #[inline]
    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Drops every frame and starts over with an empty root.
    ///
    /// The stack allocation is reused.
    pub(crate) fn reset(&mut self) {
        self.stack.clear();
        self.stack.push(Self::root());
    }

    /// Opens a frame.
    ///
    /// `declared_len` is `None` for an indefinite-length item. It is ignored
    /// for tags (always one child) and string chunks (always indefinite). A
    /// container with a declared length of zero is complete immediately.
    pub(crate) fn open(&mut self, kind: FrameKind, declared_len: Option<usize>) -> Result<()> {
        if let Some(Frame::Open { container, .. }) = self.stack.last() {
            if container.is_chunks() {
                return Err(Error::with_kind(ErrorKind::InvalidChunk));
            }
        }

        let remaining = declared_len.map_or(Remaining::Indefinite, Remaining::Exact);
        let frame = match kind {
            FrameKind::Tag(num) => Frame::Tag(num),
            FrameKind::Array => Frame::Open {
                container: Container::Array(Vec::with_capacity(cautious::<Value>(
                    declared_len.unwrap_or(0),
                ))),
                remaining,
            },
            FrameKind::Map => Frame::Open {
                container: Container::Object {
                    entries: BTreeMap::new(),
                    pending_key: None,
                },
                remaining,
            },
            FrameKind::ByteChunks => Frame::Open {
                container: Container::ByteChunks(Vec::new()),
                remaining: Remaining::Indefinite,
            },
            FrameKind::TextChunks => Frame::Open {
                container: Container::TextChunks(String::new()),
                remaining: Remaining::Indefinite,
            },
        };

        match frame {
            Frame::Open {
                container,
                remaining: Remaining::Exact(0),
            } => self.push(container.into_value()),
            frame => {
                trace!(?kind, ?declared_len, depth = self.stack.len(), "open frame");
                self.stack.push(frame);
                Ok(())
            }
        }
    }

    /// Routes a value into the current frame and closes every frame it
    /// completes.
    pub(crate) fn push(&mut self, value: Value) -> Result<()> {
        let mut value = value;
        loop {
            let Some(frame) = self.stack.last_mut() else {
                return Err(Error::with_kind(ErrorKind::UnexpectedBreak));
            };

            match frame {
                Frame::Tag(num) => {
                    let num = *num;
                    self.stack.pop();
                    trace!(num, depth = self.stack.len(), "close tag");
                    value = Value::Tag(Tag::new(num, Box::new(value)));
                }
                Frame::Open {
                    container,
                    remaining,
                } => {
                    let is_complete = container.accept(value)? && remaining.count();
                    if !is_complete {
                        return Ok(());
                    }
                    value = self.pop_container()?;
                    trace!(depth = self.stack.len(), "close frame");
                }
            }
        }
    }

    fn pop_container(&mut self) -> Result<Value> {
        match self.stack.pop() {
            Some(Frame::Open { container, .. }) => Ok(container.into_value()),
            Some(Frame::Tag(_)) | None => Err(Error::with_kind(ErrorKind::Truncated)),
        }
    }

    /// Closes the current indefinite-length frame on a break.
    pub(crate) fn close_indefinite(&mut self) -> Result<()> {
        if self.stack.len() <= 1 {
            return Err(Error::with_kind(ErrorKind::UnexpectedBreak));
        }
        match self.stack.last() {
            Some(Frame::Open {
                container,
                remaining: Remaining::Indefinite,
            }) => {
                if container.has_pending_key() {
                    return Err(Error::with_kind(ErrorKind::MissingMapValue));
                }
            }
            _ => return Err(Error::with_kind(ErrorKind::UnexpectedBreak)),
        }

        let value = self.pop_container()?;
        trace!(depth = self.stack.len(), "close indefinite frame");
        self.push(value)
    }

    /// Returns every top-level value and leaves an empty root behind.
    pub(crate) fn finish(&mut self) -> Result<Vec<Value>> {
        if self.stack.len() != 1 {
            return Err(Error::with_kind(ErrorKind::Truncated));
        }
        match self.stack.last_mut() {
            Some(Frame::Open {
                container: Container::Array(items),
                ..
            }) => Ok(mem::take(items)),
            _ => Err(Error::with_kind(ErrorKind::Truncated)),
        }
    }
}
