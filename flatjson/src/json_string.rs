// SPDX-License-Identifier: Apache-2.0

use core::ops::Deref;

/// The text of a name or string value.
///
/// 'a is the lifetime of the original input buffer.
/// 's is the lifetime of the scratch buffer.
///
/// Raw input bytes are not validated as UTF-8, so the text is exposed as
/// bytes; use [`JsonStr::to_str`] when UTF-8 is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonStr<'a, 's> {
    /// A raw slice from the original input, used when no unescaping is needed.
    Borrowed(&'a [u8]),
    /// A slice from the scratch buffer, used when escapes had to be decoded.
    Unescaped(&'s [u8]),
}

impl JsonStr<'_, '_> {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            JsonStr::Borrowed(b) => b,
            JsonStr::Unescaped(b) => b,
        }
    }

    /// The text as `&str`, if it is valid UTF-8.
    pub fn to_str(&self) -> Result<&str, core::str::Utf8Error> {
        core::str::from_utf8(self.as_bytes())
    }

    /// Whether the text aliases the input rather than the scratch buffer.
    pub fn is_borrowed(&self) -> bool {
        matches!(self, JsonStr::Borrowed(_))
    }
}

impl AsRef<[u8]> for JsonStr<'_, '_> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Deref for JsonStr<'_, '_> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

/// Writes the text, replacing invalid UTF-8 with U+FFFD.
impl core::fmt::Display for JsonStr<'_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for chunk in self.as_bytes().utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_str("\u{FFFD}")?;
            }
        }
        Ok(())
    }
}
