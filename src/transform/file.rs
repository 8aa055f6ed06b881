//! Streaming file encryption
//!
//! File format:
//! [16 bytes: IV]
//! [N bytes: AES-CBC ciphertext, PKCS#7 padded]
//!
//! No header, length or checksum. Output from a failed run is left on disk
//! as-is and must be treated as invalid by the caller.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{derive_key, Credentials};
use crate::config::{CharacterSets, Config};
use crate::crypto::{generate_iv, CipherHandle, CipherPipeline, IV_LEN};
use crate::error::{CryptError, Result};

/// Read buffer size used when none is specified
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// What happened to a file request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Output written; byte count includes the IV when encrypting
    Completed { bytes_read: u64, bytes_written: u64 },
    /// Input missing; nothing was written
    InputNotFound(PathBuf),
}

/// Encrypts and decrypts files in fixed-size chunks
pub struct FileTransform<'a> {
    config: &'a Config,
    charsets: CharacterSets,
    chunk_size: usize,
}

impl<'a> FileTransform<'a> {
    /// Transform using the default charsets and chunk size
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            charsets: CharacterSets::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Replace the salter charset whitelist
    pub fn with_charsets(mut self, charsets: CharacterSets) -> Self {
        self.charsets = charsets;
        self
    }

    /// Read `chunk_size` bytes at a time (at least one)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Write IV ‖ ciphertext of `input` to `output`
    pub fn encrypt(
        &self,
        credentials: Credentials,
        input: &Path,
        output: &Path,
    ) -> Result<FileOutcome> {
        if !input.is_file() {
            warn!(path = %input.display(), "input file does not exist");
            return Ok(FileOutcome::InputNotFound(input.to_path_buf()));
        }
        ensure_distinct(input, output)?;
        info!(input = %input.display(), output = %output.display(), "encrypting file");

        let key = derive_key(self.config, &self.charsets, credentials)?;
        let iv = generate_iv();
        let handle = CipherPipeline::new(self.config).init_encrypt(&key, &iv)?;

        let mut reader = File::open(input).map_err(|e| CryptError::file(input, e))?;
        let mut writer = create_output(output)?;

        writer.write_all(&iv).map_err(|e| CryptError::file(output, e))?;
        let (bytes_read, body) = self.pump(handle, &mut reader, input, &mut writer, output)?;

        let outcome = FileOutcome::Completed {
            bytes_read,
            bytes_written: IV_LEN as u64 + body,
        };
        debug!(?outcome, "file encrypted");
        Ok(outcome)
    }

    /// Read IV ‖ ciphertext from `input` and write the plaintext to `output`
    pub fn decrypt(
        &self,
        credentials: Credentials,
        input: &Path,
        output: &Path,
    ) -> Result<FileOutcome> {
        if !input.is_file() {
            warn!(path = %input.display(), "input file does not exist");
            return Ok(FileOutcome::InputNotFound(input.to_path_buf()));
        }
        ensure_distinct(input, output)?;
        info!(input = %input.display(), output = %output.display(), "decrypting file");

        let mut reader = File::open(input).map_err(|e| CryptError::file(input, e))?;

        let mut iv = [0u8; IV_LEN];
        let got = read_full(&mut reader, &mut iv).map_err(|e| CryptError::file(input, e))?;
        if got < IV_LEN {
            return Err(CryptError::Format(format!(
                "'{}' is {} bytes, shorter than the {}-byte IV",
                input.display(),
                got,
                IV_LEN
            )));
        }

        let key = derive_key(self.config, &self.charsets, credentials)?;
        let handle = CipherPipeline::new(self.config).init_decrypt(&key, &iv)?;

        let mut writer = create_output(output)?;
        let (body, bytes_written) = self.pump(handle, &mut reader, input, &mut writer, output)?;

        let outcome = FileOutcome::Completed {
            bytes_read: IV_LEN as u64 + body,
            bytes_written,
        };
        debug!(?outcome, "file decrypted");
        Ok(outcome)
    }

    /// Stream `reader` through the cipher into `writer`.
    /// Returns (bytes read, bytes written).
    fn pump<R: Read, W: Write>(
        &self,
        mut handle: CipherHandle,
        reader: &mut R,
        input: &Path,
        writer: &mut W,
        output: &Path,
    ) -> Result<(u64, u64)> {
        let mut buffer = vec![0u8; self.chunk_size];
        let mut read_total = 0u64;
        let mut written_total = 0u64;

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(CryptError::file(input, e)),
            };
            read_total += n as u64;

            let produced = handle.update(&buffer[..n]);
            if !produced.is_empty() {
                writer.write_all(&produced).map_err(|e| CryptError::file(output, e))?;
                written_total += produced.len() as u64;
            }
        }

        let last = handle.finish()?;
        writer.write_all(&last).map_err(|e| CryptError::file(output, e))?;
        written_total += last.len() as u64;
        writer.flush().map_err(|e| CryptError::file(output, e))?;

        Ok((read_total, written_total))
    }
}

/// Creating the output truncates it, so it must not be the input
fn ensure_distinct(input: &Path, output: &Path) -> Result<()> {
    if !output.exists() {
        return Ok(());
    }

    let input_real = fs::canonicalize(input).map_err(|e| CryptError::file(input, e))?;
    let output_real = fs::canonicalize(output).map_err(|e| CryptError::file(output, e))?;

    if input_real == output_real {
        return Err(CryptError::SameFile(output.to_path_buf()));
    }
    Ok(())
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| CryptError::file(path, e))
}

/// Fill `buf` as far as the reader allows; returns the number of bytes read
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
