//! Dictionary (back-reference) compression
//!
//! A greedy LZ-style coder. Output is a stream of literal bytes and 4-byte
//! match tokens `[MARKER][offset lo][offset hi][length]`, where `offset` is
//! the distance back from the current output position.
//!
//! A literal equal to `MARKER` cannot be told apart from a token. The escaped
//! dialect writes such literals as `[MARKER][0][0][count]`; offset 0 never
//! names a real match, so streams without escapes decode the same way under
//! either dialect. The legacy dialect writes the raw byte and will misdecode
//! it.

/// First byte of every match token.
pub const MARKER: u8 = 0xFF;
/// Longest match a single token can describe.
pub const MAX_MATCH: usize = 255;
const TOKEN_LEN: usize = 4;

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryParams {
    /// Bytes searched behind the cursor, at most `u16::MAX`.
    pub window: usize,
    /// Shortest match worth a token.
    pub min_match: usize,
    pub escape_marker: bool,
}

impl Default for DictionaryParams {
    fn default() -> Self {
        Self {
            window: 1024,
            min_match: 4,
            escape_marker: true,
        }
    }
}

fn push_token(output: &mut Vec<u8>, offset: u16, length: u8) {
    output.push(MARKER);
    output.extend_from_slice(&offset.to_le_bytes());
    output.push(length);
}

/// Find the longest match for `data[pos..]` that starts inside the window.
/// Returns `(start, length)`; matches may run past `pos`.
fn longest_match(data: &[u8], pos: usize, window: usize) -> (usize, usize) {
    let limit = (data.len() - pos).min(MAX_MATCH);
    let mut best = (0, 0);
    for start in pos.saturating_sub(window)..pos {
        let len = data[start..]
            .iter()
            .zip(&data[pos..pos + limit])
            .take_while(|(a, b)| a == b)
            .count();
        if len > best.1 {
            best = (start, len);
            if len == limit {
                break;
            }
        }
    }
    best
}

/// Compress `data` in a single greedy pass.
pub fn compress(data: &[u8], params: &DictionaryParams) -> Vec<u8> {
    let window = params.window.min(u16::MAX as usize);
    let min_match = params.min_match.max(1);
    let mut output = Vec::with_capacity(data.len());
    let mut pos = 0;

    while pos < data.len() {
        let (start, len) = longest_match(data, pos, window);
        if len >= min_match {
            push_token(&mut output, (pos - start) as u16, len as u8);
            pos += len;
        } else if data[pos] == MARKER && params.escape_marker {
            let run = data[pos..]
                .iter()
                .take(MAX_MATCH)
                .take_while(|&&b| b == MARKER)
                .count();
            push_token(&mut output, 0, run as u8);
            pos += run;
        } else {
            output.push(data[pos]);
            pos += 1;
        }
    }

    output
}

/// Expand a token stream.
///
/// A marker with fewer than three bytes after it is a literal. A reference
/// reaching before the start of the output ends decoding early.
pub fn decompress(data: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(data.len() * 2);
    let mut pos = 0;

    while pos < data.len() {
        if data[pos] != MARKER || pos + TOKEN_LEN > data.len() {
            output.push(data[pos]);
            pos += 1;
            continue;
        }

        let offset = u16::from_le_bytes([data[pos + 1], data[pos + 2]]) as usize;
        let length = data[pos + 3] as usize;
        pos += TOKEN_LEN;

        if offset == 0 {
            output.resize(output.len() + length, MARKER);
            continue;
        }
        if offset > output.len() {
            tracing::debug!(offset, produced = output.len(), "back-reference out of range");
            break;
        }
        let start = output.len() - offset;
        for i in 0..length {
            let byte = output[start + i];
            output.push(byte);
        }
    }

    output
}
