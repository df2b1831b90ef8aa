use std::borrow::Cow;

use super::{ByteSource, CharSource};
use crate::error::SourceError;
use crate::position::Position;

/// A "union" source: reads from the first source until it reports EOF, then
/// transparently switches to the second, carrying running position counters
/// across the boundary.
///
/// There is no callback from child to parent, just an internal
/// discriminant flip on the owner's own next pull.
pub struct ChainedByteSource<A, B> {
    first: A,
    second: B,
    on_second: bool,
    boundary_offset: Position,
}

impl<A: ByteSource, B: ByteSource> ChainedByteSource<A, B> {
    pub fn new(first: A, second: B) -> Self {
        ChainedByteSource {
            first,
            second,
            on_second: false,
            boundary_offset: Position::start(),
        }
    }

    fn maybe_switch(&mut self) {
        if !self.on_second && self.first.available() == 0 && self.first.is_final() {
            self.boundary_offset = self.first.position();
            self.on_second = true;
        }
    }
}

impl<A: ByteSource, B: ByteSource> ByteSource for ChainedByteSource<A, B> {
    fn available(&self) -> usize {
        if self.on_second {
            self.second.available()
        } else {
            self.first.available()
        }
    }

    fn get(&mut self) -> Option<u8> {
        self.maybe_switch();
        if self.on_second {
            self.second.get()
        } else {
            self.first.get()
        }
    }

    fn get_n(&mut self, n: usize) -> Result<Cow<'_, [u8]>, SourceError> {
        self.maybe_switch();
        if self.on_second {
            self.second.get_n(n)
        } else {
            self.first.get_n(n)
        }
    }

    fn mark(&mut self, n: usize) {
        if self.on_second {
            self.second.mark(n);
        } else {
            self.first.mark(n);
        }
    }

    fn reset(&mut self) -> Result<(), SourceError> {
        if self.on_second {
            self.second.reset()
        } else {
            self.first.reset()
        }
    }

    fn position(&self) -> Position {
        let base = if self.on_second {
            self.second.position()
        } else {
            self.first.position()
        };
        if self.on_second {
            Position {
                byte: self.boundary_offset.byte + base.byte,
                char: self.boundary_offset.char + base.char,
                line: self.boundary_offset.line + base.line - 1,
                column: if base.line == 1 {
                    self.boundary_offset.column + base.column - 1
                } else {
                    base.column
                },
            }
        } else {
            base
        }
    }

    fn is_final(&self) -> bool {
        self.on_second && self.second.is_final()
    }
}

/// The char-level counterpart of [`ChainedByteSource`].
pub struct ChainedCharSource<A, B> {
    first: A,
    second: B,
    on_second: bool,
    boundary_offset: Position,
}

impl<A: CharSource, B: CharSource> ChainedCharSource<A, B> {
    pub fn new(first: A, second: B) -> Self {
        ChainedCharSource {
            first,
            second,
            on_second: false,
            boundary_offset: Position::start(),
        }
    }

    fn maybe_switch(&mut self) {
        if !self.on_second && self.first.available() == 0 && self.first.is_final() {
            self.boundary_offset = self.first.position();
            self.on_second = true;
        }
    }
}

impl<A: CharSource, B: CharSource> CharSource for ChainedCharSource<A, B> {
    fn available(&self) -> usize {
        if self.on_second {
            self.second.available()
        } else {
            self.first.available()
        }
    }

    fn get(&mut self) -> Result<Option<char>, SourceError> {
        self.maybe_switch();
        if self.on_second {
            self.second.get()
        } else {
            self.first.get()
        }
    }

    fn mark(&mut self, n: usize) {
        if self.on_second {
            self.second.mark(n);
        } else {
            self.first.mark(n);
        }
    }

    fn reset(&mut self) -> Result<(), SourceError> {
        if self.on_second {
            self.second.reset()
        } else {
            self.first.reset()
        }
    }

    fn position(&self) -> Position {
        let base = if self.on_second {
            self.second.position()
        } else {
            self.first.position()
        };
        if self.on_second {
            Position {
                byte: self.boundary_offset.byte + base.byte,
                char: self.boundary_offset.char + base.char,
                line: self.boundary_offset.line + base.line - 1,
                column: if base.line == 1 {
                    self.boundary_offset.column + base.column - 1
                } else {
                    base.column
                },
            }
        } else {
            base
        }
    }

    fn is_final(&self) -> bool {
        self.on_second && self.second.is_final()
    }
}
