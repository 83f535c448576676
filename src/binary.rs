//! The binary glTF (GLB) container.

use byteorder::{LittleEndian, WriteBytesExt};
use std::borrow::Cow;
use std::io;

use crate::util::align_to_multiple_of_four;
use crate::Error;

/// Size of the GLB file header in bytes.
const HEADER_LENGTH: usize = 12;

/// Size of one chunk header (length + type) in bytes.
const CHUNK_HEADER_LENGTH: usize = 8;

/// The `glTF` magic, little-endian `0x46546C67`.
const MAGIC: &[u8; 4] = b"glTF";

/// The container format version.
const VERSION: u32 = 2;

/// Binary glTF contents ready for framing.
#[derive(Clone, Debug)]
pub struct Glb<'a> {
    /// The JSON chunk payload.
    pub json: Cow<'a, [u8]>,

    /// The optional BIN chunk payload.
    ///
    /// `Some` with an empty slice still emits a zero-length BIN chunk.
    pub bin: Option<Cow<'a, [u8]>>,
}

impl<'a> Glb<'a> {
    /// Total byte length of the framed container.
    fn length(&self) -> usize {
        let mut length = HEADER_LENGTH + CHUNK_HEADER_LENGTH + self.json.len();
        length = align_to_multiple_of_four(length);
        if let Some(bin) = self.bin.as_ref() {
            length += CHUNK_HEADER_LENGTH + bin.len();
            length = align_to_multiple_of_four(length);
        }
        length
    }

    /// Writes binary glTF to a writer.
    pub fn to_writer<W>(&self, mut writer: W) -> Result<(), Error>
    where
        W: io::Write,
    {
        writer.write_all(MAGIC)?;
        writer.write_u32::<LittleEndian>(VERSION)?;
        writer.write_u32::<LittleEndian>(self.length() as u32)?;

        {
            let length = align_to_multiple_of_four(self.json.len());
            let padding = length - self.json.len();

            writer.write_u32::<LittleEndian>(length as u32)?;
            writer.write_all(b"JSON")?;
            writer.write_all(&self.json)?;
            for _ in 0..padding {
                writer.write_u8(0x20)?;
            }
        }

        if let Some(bin) = self.bin.as_ref() {
            let length = align_to_multiple_of_four(bin.len());
            let padding = length - bin.len();

            writer.write_u32::<LittleEndian>(length as u32)?;
            writer.write_all(b"BIN\0")?;
            writer.write_all(bin)?;
            for _ in 0..padding {
                writer.write_u8(0)?;
            }
        }

        Ok(())
    }

    /// Writes binary glTF to a byte vector.
    pub fn to_vec(&self) -> Result<Vec<u8>, Error> {
        let mut vec = Vec::with_capacity(self.length());
        self.to_writer(&mut vec)?;
        Ok(vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_chunks_are_framed() {
        let glb = Glb {
            json: Cow::Borrowed(br#"{"asset":{"version":"2.0"}}"#),
            bin: Some(Cow::Borrowed(&[1u8, 2, 3])),
        };
        let bytes = glb.to_vec().unwrap();

        assert_eq!(b"glTF", &bytes[0..4]);
        assert_eq!(2, u32::from_le_bytes(bytes[4..8].try_into().unwrap()));
        let total = u32::from_le_bytes(bytes[8..12].try_into().unwrap());
        assert_eq!(bytes.len(), total as usize);

        let json_length =
            u32::from_le_bytes(bytes[12..16].try_into().unwrap()) as usize;
        assert_eq!(0, json_length % 4);
        assert_eq!(b"JSON", &bytes[16..20]);
        // JSON is padded with spaces.
        assert_eq!(0x20, bytes[20 + json_length - 1]);

        let bin_offset = 20 + json_length;
        let bin_length = u32::from_le_bytes(
            bytes[bin_offset..bin_offset + 4].try_into().unwrap(),
        ) as usize;
        assert_eq!(4, bin_length);
        assert_eq!(b"BIN\0", &bytes[bin_offset + 4..bin_offset + 8]);
        assert_eq!(&[1, 2, 3, 0], &bytes[bin_offset + 8..bin_offset + 12]);
    }

    #[test]
    fn empty_bin_chunk_is_still_emitted() {
        let glb = Glb {
            json: Cow::Borrowed(br#"{}"#),
            bin: Some(Cow::Borrowed(&[])),
        };
        let bytes = glb.to_vec().unwrap();
        let json_length =
            u32::from_le_bytes(bytes[12..16].try_into().unwrap()) as usize;
        let bin_offset = 20 + json_length;
        let bin_length = u32::from_le_bytes(
            bytes[bin_offset..bin_offset + 4].try_into().unwrap(),
        );
        assert_eq!(0, bin_length);
        assert_eq!(b"BIN\0", &bytes[bin_offset + 4..bin_offset + 8]);
        assert_eq!(bytes.len(), bin_offset + 8);
    }
}
