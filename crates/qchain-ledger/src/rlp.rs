//! Recursive Length Prefix encoding, as needed for legacy transactions.

/// Encode a byte string.
pub fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    if bytes.len() == 1 && bytes[0] < 0x80 {
        return bytes.to_vec();
    }
    let mut out = length_prefix(0x80, bytes.len());
    out.extend_from_slice(bytes);
    out
}

/// Encode an unsigned integer (big-endian, no leading zeros).
pub fn encode_uint(value: u128) -> Vec<u8> {
    encode_scalar(&value.to_be_bytes())
}

/// Encode a big-endian unsigned scalar of any width, stripping leading zeros.
pub fn encode_scalar(be_bytes: &[u8]) -> Vec<u8> {
    let first = be_bytes
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(be_bytes.len());
    encode_bytes(&be_bytes[first..])
}

/// Encode a list of already-encoded items.
pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload_len: usize = items.iter().map(Vec::len).sum();
    let mut out = length_prefix(0xc0, payload_len);
    out.reserve(payload_len);
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

fn length_prefix(offset: u8, len: usize) -> Vec<u8> {
    if len <= 55 {
        return vec![offset + len as u8];
    }
    let be = len.to_be_bytes();
    let first = be.iter().position(|b| *b != 0).unwrap_or(be.len() - 1);
    let len_bytes = &be[first..];
    let mut out = Vec::with_capacity(1 + len_bytes.len());
    out.push(offset + 55 + len_bytes.len() as u8);
    out.extend_from_slice(len_bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_strings() {
        assert_eq!(encode_bytes(b"dog"), vec![0x83, b'd', b'o', b'g']);
        assert_eq!(encode_bytes(b""), vec![0x80]);
        assert_eq!(encode_bytes(&[0x0f]), vec![0x0f]);
        assert_eq!(encode_bytes(&[0x80]), vec![0x81, 0x80]);
    }

    #[test]
    fn test_integers() {
        assert_eq!(encode_uint(0), vec![0x80]);
        assert_eq!(encode_uint(15), vec![0x0f]);
        assert_eq!(encode_uint(1024), vec![0x82, 0x04, 0x00]);
    }

    #[test]
    fn test_long_string() {
        let s = b"Lorem ipsum dolor sit amet, consectetur adipisicing elit";
        assert_eq!(s.len(), 56);
        let enc = encode_bytes(s);
        assert_eq!(&enc[..2], &[0xb8, 0x38]);
        assert_eq!(&enc[2..], s);
    }

    #[test]
    fn test_lists() {
        let list = encode_list(&[encode_bytes(b"cat"), encode_bytes(b"dog")]);
        assert_eq!(
            list,
            vec![0xc8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g']
        );
        assert_eq!(encode_list(&[]), vec![0xc0]);
    }

    #[test]
    fn test_scalar_strips_leading_zeros() {
        let mut word = [0u8; 32];
        word[31] = 0x25;
        assert_eq!(encode_scalar(&word), vec![0x25]);
        assert_eq!(encode_scalar(&[0u8; 32]), vec![0x80]);
    }
}
