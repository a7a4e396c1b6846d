//! Text formatting bitmask codec.
//!
//! A run of text carries its inline attributes as a single integer on the
//! wire. Each attribute owns one bit, so any combination is valid. Bits this
//! version does not know about are carried along untouched.

use std::collections::BTreeSet;
use std::fmt;

/// An inline formatting attribute with a fixed bit on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatFlag {
    Bold,
    Italic,
    Strikethrough,
    Underline,
    Code,
}

impl FormatFlag {
    /// All defined flags, in bit order.
    pub const ALL: [FormatFlag; 5] = [
        FormatFlag::Bold,
        FormatFlag::Italic,
        FormatFlag::Strikethrough,
        FormatFlag::Underline,
        FormatFlag::Code,
    ];

    /// Nesting order for markup, outermost first.
    pub const NESTING_ORDER: [FormatFlag; 5] = [
        FormatFlag::Bold,
        FormatFlag::Italic,
        FormatFlag::Underline,
        FormatFlag::Strikethrough,
        FormatFlag::Code,
    ];

    pub const fn bit(self) -> u32 {
        match self {
            FormatFlag::Bold => 1,
            FormatFlag::Italic => 1 << 1,
            FormatFlag::Strikethrough => 1 << 2,
            FormatFlag::Underline => 1 << 3,
            FormatFlag::Code => 1 << 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FormatFlag::Bold => "bold",
            FormatFlag::Italic => "italic",
            FormatFlag::Strikethrough => "strikethrough",
            FormatFlag::Underline => "underline",
            FormatFlag::Code => "code",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        FormatFlag::ALL.into_iter().find(|flag| flag.name() == name)
    }
}

impl fmt::Display for FormatFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mask of every bit owned by a defined flag.
pub const KNOWN_BITS: u32 = 0b1_1111;

/// Raw formatting mask as stored on a text node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextFormat(pub u32);

impl TextFormat {
    pub const PLAIN: TextFormat = TextFormat(0);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, flag: FormatFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// Returns a copy with `flag` set or cleared.
    pub fn with(self, flag: FormatFlag, enabled: bool) -> Self {
        if enabled {
            TextFormat(self.0 | flag.bit())
        } else {
            TextFormat(self.0 & !flag.bit())
        }
    }

    pub fn decode(self) -> FormatSet {
        decode(self.0)
    }
}

impl From<u32> for TextFormat {
    fn from(value: u32) -> Self {
        TextFormat(value)
    }
}

impl From<&FormatSet> for TextFormat {
    fn from(set: &FormatSet) -> Self {
        TextFormat(encode(set))
    }
}

/// Decoded formatting: the named flags plus any bits this version does not define.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatSet {
    pub flags: BTreeSet<FormatFlag>,
    pub unknown_bits: u32,
}

impl FormatSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = FormatFlag>,
    {
        Self {
            flags: flags.into_iter().collect(),
            unknown_bits: 0,
        }
    }

    pub fn contains(&self, flag: FormatFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn is_plain(&self) -> bool {
        self.flags.is_empty()
    }

    /// Set flags in markup nesting order, outermost first.
    pub fn nesting(&self) -> impl Iterator<Item = FormatFlag> + '_ {
        FormatFlag::NESTING_ORDER
            .into_iter()
            .filter(move |flag| self.flags.contains(flag))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.flags.iter().map(|flag| flag.name()).collect()
    }
}

/// Encode a set of flags, including its preserved unknown bits.
pub fn encode(set: &FormatSet) -> u32 {
    set.flags
        .iter()
        .fold(set.unknown_bits & !KNOWN_BITS, |mask, flag| mask | flag.bit())
}

/// Encode flags given by name. Unrecognised names are ignored.
pub fn encode_names<'a, I>(names: I) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter_map(FormatFlag::from_name)
        .fold(0, |mask, flag| mask | flag.bit())
}

pub fn decode(mask: u32) -> FormatSet {
    FormatSet {
        flags: FormatFlag::ALL
            .into_iter()
            .filter(|flag| mask & flag.bit() != 0)
            .collect(),
        unknown_bits: mask & !KNOWN_BITS,
    }
}
