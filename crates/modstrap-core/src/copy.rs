//! Buffered byte copy from embedded sources into destination files.
//!
//! The extractor reuses a single [`CopyBuffer`] for every file of a walk,
//! so materializing a tree performs no per-file buffer allocation.

use std::io;
use std::io::Read;
use std::io::Write;

/// Buffer size for copying (64KB).
///
/// Matches typical filesystem block sizes.
pub const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable, heap-allocated copy buffer.
///
/// # Examples
///
/// ```
/// use modstrap_core::copy::CopyBuffer;
/// use modstrap_core::copy::copy_with_buffer;
///
/// # fn main() -> std::io::Result<()> {
/// let mut buffer = CopyBuffer::new();
/// let mut input: &[u8] = b"x: 1";
/// let mut output = Vec::new();
///
/// let copied = copy_with_buffer(&mut input, &mut output, &mut buffer, |_| {})?;
/// assert_eq!(copied, 4);
/// assert_eq!(output, b"x: 1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a zeroed buffer of [`COPY_BUFFER_SIZE`] bytes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies all bytes from `reader` to `writer` through `buffer`.
///
/// `on_chunk` is called with the size of every chunk after it has been
/// written. Interrupted reads are retried.
///
/// # Errors
///
/// Returns the first read or write error. Bytes written before the error
/// stay in `writer`; nothing is rolled back.
pub fn copy_with_buffer<R, W, F>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
    mut on_chunk: F,
) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    F: FnMut(u64),
{
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;

        let chunk = bytes_read as u64;
        total = total
            .checked_add(chunk)
            .ok_or_else(|| io::Error::other("copied byte count overflowed u64"))?;
        on_chunk(chunk);
    }

    Ok(total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_copy_buffer_size() {
        assert_eq!(CopyBuffer::new().size(), COPY_BUFFER_SIZE);
        assert_eq!(CopyBuffer::default().size(), COPY_BUFFER_SIZE);
    }

    #[test]
    fn test_copy_empty_source() {
        let mut buffer = CopyBuffer::new();
        let mut input = Cursor::new(Vec::<u8>::new());
        let mut output = Vec::new();

        let copied = copy_with_buffer(&mut input, &mut output, &mut buffer, |_| {}).unwrap();
        assert_eq!(copied, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_copy_multiple_chunks_reports_each() {
        let mut buffer = CopyBuffer::new();
        let input_data = vec![0x55u8; COPY_BUFFER_SIZE * 3 + 1000];
        let mut input = Cursor::new(&input_data);
        let mut output = Vec::new();
        let mut chunks = Vec::new();

        let copied =
            copy_with_buffer(&mut input, &mut output, &mut buffer, |n| chunks.push(n)).unwrap();
        assert_eq!(copied, input_data.len() as u64);
        assert_eq!(output, input_data);
        assert_eq!(chunks.iter().sum::<u64>(), copied);
        assert!(chunks.len() >= 4);
    }

    #[test]
    fn test_copy_reusable_buffer() {
        let mut buffer = CopyBuffer::new();

        let mut first = Vec::new();
        copy_with_buffer(&mut &b"first file"[..], &mut first, &mut buffer, |_| {}).unwrap();
        let mut second = Vec::new();
        copy_with_buffer(&mut &b"second"[..], &mut second, &mut buffer, |_| {}).unwrap();

        assert_eq!(first, b"first file");
        assert_eq!(second, b"second");
    }

    #[test]
    fn test_copy_byte_for_byte() {
        let mut buffer = CopyBuffer::new();
        let input_data: Vec<u8> = (0..=255u8).flat_map(|b| [b; 300]).collect();
        let mut output = Vec::new();

        copy_with_buffer(&mut input_data.as_slice(), &mut output, &mut buffer, |_| {}).unwrap();
        assert_eq!(output, input_data);
    }

    #[test]
    fn test_copy_with_interrupted_reads() {
        struct InterruptedReader {
            data: Vec<u8>,
            position: usize,
            calls: usize,
        }

        impl Read for InterruptedReader {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.calls += 1;
                if self.calls % 2 == 1 && self.position < self.data.len() {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
                }
                let remaining = &self.data[self.position..];
                let n = remaining.len().min(buf.len()).min(100);
                buf[..n].copy_from_slice(&remaining[..n]);
                self.position += n;
                Ok(n)
            }
        }

        let data = vec![0x42u8; 1000];
        let mut reader = InterruptedReader {
            data: data.clone(),
            position: 0,
            calls: 0,
        };
        let mut buffer = CopyBuffer::new();
        let mut output = Vec::new();

        let copied = copy_with_buffer(&mut reader, &mut output, &mut buffer, |_| {}).unwrap();
        assert_eq!(copied, 1000);
        assert_eq!(output, data);
    }

    #[test]
    fn test_copy_with_write_failure() {
        struct FailingWriter {
            written: usize,
            fail_after: usize,
        }

        impl Write for FailingWriter {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                if self.written >= self.fail_after {
                    return Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"));
                }
                let n = (self.fail_after - self.written).min(buf.len());
                self.written += n;
                Ok(n)
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut input = Cursor::new(vec![0x42u8; 1000]);
        let mut writer = FailingWriter {
            written: 0,
            fail_after: 500,
        };
        let mut buffer = CopyBuffer::new();

        let err = copy_with_buffer(&mut input, &mut writer, &mut buffer, |_| {}).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::StorageFull);
        assert_eq!(writer.written, 500);
    }
}
