use std::io::{self, Read};

use ssr_api::{Error, Result};

pub const DELIMITER: u8 = 0;
pub const READ_AHEAD_SIZE: usize = 2048;

const DEFAULT_CHUNK_CAPACITY: usize = 32 * 1024;

/// Splits a byte stream into chunks on [`DELIMITER`].
///
/// Reads go through a fixed read-ahead buffer; bytes of a chunk are collected
/// in the chunk buffer until a delimiter shows up, no matter how the stream
/// happens to be split into reads.
#[derive(Debug)]
pub struct FrameReader<R> {
    reader: R,
    read_ahead: Box<[u8]>,
    start: usize,
    end: usize,
    chunk: Vec<u8>,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R) -> FrameReader<R> {
        FrameReader::with_buffer(reader, Vec::with_capacity(DEFAULT_CHUNK_CAPACITY))
    }

    pub fn with_buffer(reader: R, chunk: Vec<u8>) -> FrameReader<R> {
        FrameReader {
            reader,
            read_ahead: vec![0; READ_AHEAD_SIZE].into_boxed_slice(),
            start: 0,
            end: 0,
            chunk,
        }
    }

    /// Blocks until the next complete chunk is available.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. Bytes after the last
    /// delimiter are discarded at that point.
    pub fn next_chunk(&mut self) -> io::Result<Option<&[u8]>> {
        self.chunk.clear();

        loop {
            if self.start < self.end {
                let pending = &self.read_ahead[self.start..self.end];

                if let Some(pos) = pending.iter().position(|&b| b == DELIMITER) {
                    self.chunk.extend_from_slice(&pending[..pos]);
                    self.start += pos + 1;

                    tracing::trace!(
                        len = self.chunk.len(),
                        chunk = %String::from_utf8_lossy(&self.chunk),
                        "received chunk"
                    );

                    return Ok(Some(&self.chunk));
                }

                self.chunk.extend_from_slice(pending);
                self.start = 0;
                self.end = 0;
            }

            match self.reader.read(&mut self.read_ahead) {
                Ok(0) => {
                    if !self.chunk.is_empty() {
                        tracing::debug!(len = self.chunk.len(), "dropping unterminated chunk");
                    }
                    return Ok(None);
                }
                Ok(n) => {
                    self.start = 0;
                    self.end = n;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Appends `payload` and the trailing delimiter to `out`.
pub fn encode_frame(payload: &[u8], out: &mut Vec<u8>) -> Result<()> {
    if payload.contains(&DELIMITER) {
        return Err(Error::InvalidFrame);
    }

    out.reserve(payload.len() + 1);
    out.extend_from_slice(payload);
    out.push(DELIMITER);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    /// Hands out the wrapped bytes in reads of random, small size.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        rng: SmallRng,
        max: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pos == self.data.len() {
                return Ok(0);
            }

            let max = self.max.min(buf.len()).min(self.data.len() - self.pos);
            let n = self.rng.gen_range(1..=max);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    fn collect<R: Read>(mut reader: FrameReader<R>) -> Vec<Vec<u8>> {
        let mut chunks = Vec::new();
        while let Some(chunk) = reader.next_chunk().unwrap() {
            chunks.push(chunk.to_vec());
        }
        chunks
    }

    #[test]
    fn splits_on_delimiter() {
        let reader = FrameReader::new(Cursor::new(b"<a/>\0<b/>\0\0tail".to_vec()));
        assert_eq!(
            collect(reader),
            vec![b"<a/>".to_vec(), b"<b/>".to_vec(), Vec::new()]
        );
    }

    #[test]
    fn empty_stream() {
        let reader = FrameReader::new(Cursor::new(Vec::new()));
        assert!(collect(reader).is_empty());
    }

    #[test]
    fn chunk_larger_than_read_ahead() {
        let big = vec![b'x'; READ_AHEAD_SIZE * 3 + 17];
        let mut data = big.clone();
        data.push(DELIMITER);
        data.extend_from_slice(b"next\0");

        let reader = FrameReader::new(Cursor::new(data));
        assert_eq!(collect(reader), vec![big, b"next".to_vec()]);
    }

    #[test]
    fn chunk_count_matches_delimiters() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let len = rng.gen_range(0..4000);
            let data: Vec<u8> = (0..len)
                .map(|_| if rng.gen_bool(0.02) { 0 } else { rng.gen_range(1..=255) })
                .collect();

            let expected: Vec<Vec<u8>> = {
                let mut parts: Vec<Vec<u8>> =
                    data.split(|&b| b == DELIMITER).map(<[u8]>::to_vec).collect();
                // the part after the last delimiter never forms a chunk
                parts.pop();
                parts
            };

            let delimiters = data.iter().filter(|&&b| b == DELIMITER).count();
            let chunks = collect(FrameReader::new(Cursor::new(data)));
            assert_eq!(chunks.len(), delimiters);
            assert_eq!(chunks, expected);
        }
    }

    #[test]
    fn read_boundaries_do_not_matter() {
        let data = b"<update><source id=\"1\"/></update>\0<update/>\0\0<x/>\0".to_vec();
        let whole = collect(FrameReader::new(Cursor::new(data.clone())));

        for (seed, max) in [(1, 1), (2, 2), (3, 5), (4, 64)] {
            let trickle = Trickle {
                data: data.clone(),
                pos: 0,
                rng: SmallRng::seed_from_u64(seed),
                max,
            };
            assert_eq!(collect(FrameReader::new(trickle)), whole);
        }
    }

    #[test]
    fn reuses_given_buffer() {
        let mut reader = FrameReader::with_buffer(Cursor::new(b"ab\0c\0".to_vec()), Vec::new());
        assert_eq!(reader.next_chunk().unwrap(), Some(&b"ab"[..]));
        assert_eq!(reader.next_chunk().unwrap(), Some(&b"c"[..]));
        assert_eq!(reader.next_chunk().unwrap(), None);
        assert_eq!(reader.get_ref().position(), 5);
    }

    #[test]
    fn encode_appends_delimiter() {
        let mut out = Vec::new();
        encode_frame(b"<request/>", &mut out).unwrap();
        encode_frame(b"", &mut out).unwrap();
        assert_eq!(out, b"<request/>\0\0");

        assert_eq!(encode_frame(b"a\0b", &mut out), Err(Error::InvalidFrame));
    }
}
