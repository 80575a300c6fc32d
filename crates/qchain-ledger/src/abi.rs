//! Solidity ABI codec for the job-logger contract.
//!
//! Only the handful of shapes the contract uses are supported:
//!
//! - `logJob(string,string)` calldata
//! - `JobLogged(address indexed user, string jobType, string ipfsHash, uint256 timeSubmitted)` logs
//! - `getAllJobs()` returning `(address,string,string,uint256)[]`
//!
//! Every value is laid out in 32-byte words. Dynamic values (strings,
//! arrays, tuples containing either) live in a tail section and are
//! referenced from the head by a byte offset.

use qchain_core::Address;
use sha3::{Digest, Keccak256};

use crate::error::{LedgerError, LedgerResult};

/// ABI word size.
pub const WORD: usize = 32;

/// Write entry point.
pub const LOG_JOB_SIGNATURE: &str = "logJob(string,string)";

/// Event emitted on every write.
pub const JOB_LOGGED_SIGNATURE: &str = "JobLogged(address,string,string,uint256)";

/// Read-all view.
pub const GET_ALL_JOBS_SIGNATURE: &str = "getAllJobs()";

/// Keccak-256 digest.
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// First four bytes of the hash of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// `topic0` of an event, as a `0x`-prefixed hex string.
pub fn event_topic(signature: &str) -> String {
    format!("0x{}", hex::encode(keccak256(signature.as_bytes())))
}

/// Big-endian word holding `value`.
pub fn encode_uint(value: u128) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Length word followed by the bytes right-padded to a word boundary.
fn encode_string_tail(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let padded = bytes.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(WORD + padded);
    out.extend_from_slice(&encode_uint(bytes.len() as u128));
    out.extend_from_slice(bytes);
    out.resize(WORD + padded, 0);
    out
}

/// Head/tail encoding of a sequence of strings.
pub fn encode_strings(values: &[&str]) -> Vec<u8> {
    let tails: Vec<Vec<u8>> = values.iter().map(|s| encode_string_tail(s)).collect();
    let mut head = Vec::with_capacity(values.len() * WORD);
    let mut offset = values.len() * WORD;
    for tail in &tails {
        head.extend_from_slice(&encode_uint(offset as u128));
        offset += tail.len();
    }
    let mut out = head;
    for tail in tails {
        out.extend_from_slice(&tail);
    }
    out
}

/// Calldata for `logJob(jobType, description)`.
pub fn encode_log_job(job_type: &str, description: &str) -> Vec<u8> {
    let mut data = selector(LOG_JOB_SIGNATURE).to_vec();
    data.extend_from_slice(&encode_strings(&[job_type, description]));
    data
}

/// Calldata for `getAllJobs()`.
pub fn encode_get_all_jobs() -> Vec<u8> {
    selector(GET_ALL_JOBS_SIGNATURE).to_vec()
}

/// Decode a `0x`-prefixed hex blob.
pub fn decode_hex(s: &str) -> LedgerResult<Vec<u8>> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| LedgerError::Decode(format!("bad hex: {e}")))
}

/// Read-only cursor over ABI encoded bytes.
struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn word(&self, offset: usize) -> LedgerResult<&'a [u8]> {
        self.data
            .get(offset..offset + WORD)
            .ok_or_else(|| LedgerError::Decode(format!("word at {offset} out of range")))
    }

    fn usize_at(&self, offset: usize) -> LedgerResult<usize> {
        let value = word_to_u128(self.word(offset)?)?;
        usize::try_from(value)
            .ok()
            .filter(|v| *v <= self.data.len())
            .ok_or_else(|| LedgerError::Decode(format!("offset/length {value} out of range")))
    }

    fn u64_at(&self, offset: usize) -> LedgerResult<u64> {
        let value = word_to_u128(self.word(offset)?)?;
        u64::try_from(value).map_err(|_| LedgerError::Decode(format!("{value} exceeds u64")))
    }

    fn address_at(&self, offset: usize) -> LedgerResult<Address> {
        word_to_address(self.word(offset)?)
    }

    /// String whose tail starts at `base + relative`, where `relative` is
    /// stored in the head word at `head_offset`.
    fn string_at(&self, base: usize, head_offset: usize) -> LedgerResult<String> {
        let start = base + self.usize_at(head_offset)?;
        let len = self.usize_at(start)?;
        let bytes = self
            .data
            .get(start + WORD..start + WORD + len)
            .ok_or_else(|| LedgerError::Decode("string data out of range".to_string()))?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| LedgerError::Decode(format!("invalid utf-8: {e}")))
    }
}

fn word_to_u128(word: &[u8]) -> LedgerResult<u128> {
    if word[..WORD - 16].iter().any(|b| *b != 0) {
        return Err(LedgerError::Decode("uint256 exceeds u128".to_string()));
    }
    let mut buf = [0u8; 16];
    buf.copy_from_slice(&word[WORD - 16..]);
    Ok(u128::from_be_bytes(buf))
}

fn word_to_address(word: &[u8]) -> LedgerResult<Address> {
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[WORD - 20..]);
    Ok(Address::from_bytes(bytes))
}

/// Decoded `JobLogged` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobLoggedEvent {
    pub user: Address,
    pub job_type: String,
    pub ipfs_hash: String,
    pub time_submitted: u64,
}

/// Decode a `JobLogged` log from its topics and data.
///
/// `topics[0]` must be the event signature and `topics[1]` the indexed user.
pub fn decode_job_logged(topics: &[String], data: &str) -> LedgerResult<JobLoggedEvent> {
    let expected = event_topic(JOB_LOGGED_SIGNATURE);
    match topics.first() {
        Some(t) if t.eq_ignore_ascii_case(&expected) => {}
        other => {
            return Err(LedgerError::Decode(format!(
                "unexpected topic0: {other:?}"
            )));
        }
    }
    let user_topic = topics
        .get(1)
        .ok_or_else(|| LedgerError::Decode("missing indexed user topic".to_string()))?;
    let user_word = decode_hex(user_topic)?;
    if user_word.len() != WORD {
        return Err(LedgerError::Decode("user topic is not a word".to_string()));
    }

    let data = decode_hex(data)?;
    let reader = Reader::new(&data);
    Ok(JobLoggedEvent {
        user: word_to_address(&user_word)?,
        job_type: reader.string_at(0, 0)?,
        ipfs_hash: reader.string_at(0, WORD)?,
        time_submitted: reader.u64_at(2 * WORD)?,
    })
}

/// Encode `JobLogged` non-indexed data. Used by tests and the in-memory node.
pub fn encode_job_logged_data(job_type: &str, ipfs_hash: &str, time_submitted: u64) -> Vec<u8> {
    let strings = encode_strings(&[job_type, ipfs_hash]);
    let tail_start = 3 * WORD;
    let mut out = Vec::with_capacity(tail_start + strings.len());
    // Offsets shift by the extra timestamp word in the head.
    out.extend_from_slice(&encode_uint(tail_start as u128));
    let second = word_to_u128(&strings[WORD..2 * WORD]).unwrap_or(0) + WORD as u128;
    out.extend_from_slice(&encode_uint(second));
    out.extend_from_slice(&encode_uint(time_submitted as u128));
    out.extend_from_slice(&strings[2 * WORD..]);
    out
}

/// Decode the return data of `getAllJobs()`.
pub fn decode_all_jobs(data: &[u8]) -> LedgerResult<Vec<JobLoggedEvent>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let reader = Reader::new(data);
    let array_start = reader.usize_at(0)?;
    let count = reader.usize_at(array_start)?;
    let elements = array_start + WORD;

    (0..count)
        .map(|i| {
            let tuple = elements + reader.usize_at(elements + i * WORD)?;
            Ok(JobLoggedEvent {
                user: reader.address_at(tuple)?,
                job_type: reader.string_at(tuple, tuple + WORD)?,
                ipfs_hash: reader.string_at(tuple, tuple + 2 * WORD)?,
                time_submitted: reader.u64_at(tuple + 3 * WORD)?,
            })
        })
        .collect()
}

/// Encode a `getAllJobs()` return value.
pub fn encode_all_jobs(jobs: &[JobLoggedEvent]) -> Vec<u8> {
    let tuples: Vec<Vec<u8>> = jobs
        .iter()
        .map(|job| {
            let strings = encode_strings(&[&job.job_type, &job.ipfs_hash]);
            // Tuple head: address, two string offsets, timestamp.
            let head_len = 4 * WORD;
            let first = word_to_u128(&strings[..WORD]).unwrap_or(0) + 2 * WORD as u128;
            let second = word_to_u128(&strings[WORD..2 * WORD]).unwrap_or(0) + 2 * WORD as u128;
            let mut t = Vec::with_capacity(head_len + strings.len());
            let mut addr = [0u8; WORD];
            addr[WORD - 20..].copy_from_slice(&job.user.to_bytes());
            t.extend_from_slice(&addr);
            t.extend_from_slice(&encode_uint(first));
            t.extend_from_slice(&encode_uint(second));
            t.extend_from_slice(&encode_uint(job.time_submitted as u128));
            t.extend_from_slice(&strings[2 * WORD..]);
            t
        })
        .collect();

    let mut out = Vec::new();
    out.extend_from_slice(&encode_uint(WORD as u128));
    out.extend_from_slice(&encode_uint(jobs.len() as u128));
    let mut offset = jobs.len() * WORD;
    for t in &tuples {
        out.extend_from_slice(&encode_uint(offset as u128));
        offset += t.len();
    }
    for t in tuples {
        out.extend_from_slice(&t);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> Address {
        let mut b = [0u8; 20];
        b[19] = last;
        Address::from_bytes(b)
    }

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_known_selector_and_topic() {
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
        assert_eq!(
            event_topic("Transfer(address,address,uint256)"),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn test_encode_log_job_layout() {
        let data = encode_log_job("Bell", "[IBM Quantum | qasm] h q[0];");
        assert_eq!(&data[..4], &selector(LOG_JOB_SIGNATURE));
        let body = &data[4..];
        // two head words, then "Bell" (len + 1 word), then description (len + 1 word)
        assert_eq!(body.len(), 2 * WORD + 2 * WORD + 2 * WORD);
        assert_eq!(word_to_u128(&body[..WORD]).unwrap(), 64);
        assert_eq!(word_to_u128(&body[WORD..2 * WORD]).unwrap(), 128);
        assert_eq!(word_to_u128(&body[2 * WORD..3 * WORD]).unwrap(), 4);
        assert_eq!(&body[3 * WORD..3 * WORD + 4], b"Bell");
        assert!(body[3 * WORD + 4..4 * WORD].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_encode_empty_string() {
        let enc = encode_strings(&[""]);
        assert_eq!(enc.len(), 2 * WORD);
        assert_eq!(word_to_u128(&enc[WORD..]).unwrap(), 0);
    }

    #[test]
    fn test_decode_job_logged() {
        let user = addr(0xaa);
        let mut topic1 = [0u8; WORD];
        topic1[WORD - 20..].copy_from_slice(&user.to_bytes());
        let topics = vec![
            event_topic(JOB_LOGGED_SIGNATURE),
            format!("0x{}", hex::encode(topic1)),
        ];
        let long = "x".repeat(70);
        let data = format!(
            "0x{}",
            hex::encode(encode_job_logged_data("Grover", &long, 1_700_000_000))
        );

        let ev = decode_job_logged(&topics, &data).unwrap();
        assert_eq!(ev.user, user);
        assert_eq!(ev.job_type, "Grover");
        assert_eq!(ev.ipfs_hash, long);
        assert_eq!(ev.time_submitted, 1_700_000_000);
    }

    #[test]
    fn test_decode_job_logged_rejects_other_event() {
        let topics = vec![event_topic("Transfer(address,address,uint256)")];
        assert!(decode_job_logged(&topics, "0x").is_err());
        assert!(decode_job_logged(&[], "0x").is_err());
    }

    #[test]
    fn test_decode_truncated_data() {
        let user_topic = format!("0x{}", "00".repeat(32));
        let topics = vec![event_topic(JOB_LOGGED_SIGNATURE), user_topic];
        assert!(matches!(
            decode_job_logged(&topics, "0x0000"),
            Err(LedgerError::Decode(_))
        ));
    }

    #[test]
    fn test_all_jobs_roundtrip() {
        let jobs = vec![
            JobLoggedEvent {
                user: addr(1),
                job_type: "Untitled Job".into(),
                ipfs_hash: "[IBM Quantum | prompt] Factor 15".into(),
                time_submitted: 10,
            },
            JobLoggedEvent {
                user: addr(2),
                job_type: "Bell".into(),
                ipfs_hash: String::new(),
                time_submitted: 20,
            },
        ];
        assert_eq!(decode_all_jobs(&encode_all_jobs(&jobs)).unwrap(), jobs);
        assert!(decode_all_jobs(&encode_all_jobs(&[])).unwrap().is_empty());
        assert!(decode_all_jobs(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_hex() {
        assert_eq!(decode_hex("0x0a0b").unwrap(), vec![10, 11]);
        assert_eq!(decode_hex("0a0b").unwrap(), vec![10, 11]);
        assert!(decode_hex("0xzz").is_err());
    }
}
