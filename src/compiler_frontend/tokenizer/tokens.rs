use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CharPosition {
    pub line_number: i32,
    pub char_column: i32,
}

/// Span of source text a parse tree node was built from.
/// Line numbers are zero based, the same as the parser reports them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TextLocation {
    pub start_pos: CharPosition,
    pub end_pos: CharPosition,
}

impl TextLocation {
    pub fn new(start: CharPosition, end: CharPosition) -> Self {
        Self {
            start_pos: start,
            end_pos: end,
        }
    }

    pub fn new_just_line(start: i32) -> Self {
        Self {
            start_pos: CharPosition {
                line_number: start,
                char_column: 0,
            },
            end_pos: CharPosition {
                line_number: start,
                char_column: 120, // Arbitrary number
            },
        }
    }

    /// Smallest span covering both locations
    pub fn merge(&self, other: &TextLocation) -> TextLocation {
        let start_pos = if (other.start_pos.line_number, other.start_pos.char_column)
            < (self.start_pos.line_number, self.start_pos.char_column)
        {
            other.start_pos
        } else {
            self.start_pos
        };

        let end_pos = if (other.end_pos.line_number, other.end_pos.char_column)
            > (self.end_pos.line_number, self.end_pos.char_column)
        {
            other.end_pos
        } else {
            self.end_pos
        };

        TextLocation { start_pos, end_pos }
    }
}

impl Display for TextLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}, col {}",
            self.start_pos.line_number + 1,
            self.start_pos.char_column + 1
        )
    }
}
