//! Bloom filter companion for the key set.
//!
//! A sized bit array with double-hashed membership queries, usable
//! alongside or independently of the trie: a negative answer proves the
//! key was never added, so readers can skip a trie traversal entirely.
//!
//! Hashing is xxHash-64 of the UTF-8 value with seeds `s` and `s + 1`;
//! probe `i` touches bit `(h1 + i * h2) mod m`. Bits are addressed
//! most-significant-first within each byte so a base64 rendering of the
//! array preserves bit order left-to-right.

use base64::Engine;
use xxhash_rust::xxh64::xxh64;

use crate::error::{Error, Result};

/// Largest permitted hash seed (2^53 - 1).
const MAX_SEED: u64 = (1 << 53) - 1;

/// Construction parameters for a [`BloomFilter`].
///
/// Only the expected element count `n` is mandatory. The bit size `m` and
/// probe count `k` default from the target false-positive rate `p`; the
/// default `m` is rounded up to a multiple of 24 so the byte array
/// base64-encodes without padding.
///
/// # Example
///
/// ```
/// use pathmap::BloomParams;
///
/// let params = BloomParams::new(1000).fp_rate(0.01).seed(42);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BloomParams {
    n: u64,
    p: Option<f64>,
    m: Option<u64>,
    k: Option<u32>,
    s: Option<u64>,
}

impl BloomParams {
    /// Start from an expected element count.
    #[must_use]
    pub fn new(n: u64) -> Self {
        Self {
            n,
            p: None,
            m: None,
            k: None,
            s: None,
        }
    }

    /// Target false-positive rate, `0 < p < 1`.
    #[must_use]
    pub fn fp_rate(mut self, p: f64) -> Self {
        self.p = Some(p);
        self
    }

    /// Explicit bit size, overriding the default derived from `p`.
    #[must_use]
    pub fn bit_len(mut self, m: u64) -> Self {
        self.m = Some(m);
        self
    }

    /// Explicit probe count, overriding the default derived from `p`.
    #[must_use]
    pub fn hash_count(mut self, k: u32) -> Self {
        self.k = Some(k);
        self
    }

    /// Hash seed, at most 2^53 - 1.
    #[must_use]
    pub fn seed(mut self, s: u64) -> Self {
        self.s = Some(s);
        self
    }
}

/// A Bloom filter over string values.
///
/// - False positives possible (says "maybe" for some absent values)
/// - False negatives impossible (never says "absent" for an added value)
///
/// # Example
///
/// ```
/// use pathmap::{BloomFilter, BloomParams};
///
/// let mut bloom = BloomFilter::new(BloomParams::new(100).fp_rate(0.01))?;
/// bloom.add("/women/trousers");
/// assert!(bloom.has("/women/trousers"));
/// # Ok::<(), pathmap::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct BloomFilter {
    bits: Vec<u8>,
    m: u64,
    k: u32,
    seed: u64,
}

impl BloomFilter {
    /// Build an empty filter from parameters.
    ///
    /// # Errors
    ///
    /// Returns `Error::BloomConfig` when a parameter is outside its
    /// domain, or when `p` is omitted but a default depends on it.
    pub fn new(params: BloomParams) -> Result<Self> {
        if params.n == 0 {
            return Err(Error::BloomConfig {
                param: "n",
                reason: "expected element count must be positive",
            });
        }
        let seed = params.s.unwrap_or(0);
        if seed > MAX_SEED {
            return Err(Error::BloomConfig {
                param: "s",
                reason: "seed must be at most 2^53 - 1",
            });
        }
        let p = match params.p {
            Some(p) if p > 0.0 && p < 1.0 => Some(p),
            Some(_) => {
                return Err(Error::BloomConfig {
                    param: "p",
                    reason: "false-positive rate must be in (0, 1)",
                });
            }
            None => None,
        };
        let m = match params.m {
            Some(0) => {
                return Err(Error::BloomConfig {
                    param: "m",
                    reason: "bit size must be positive",
                });
            }
            Some(m) => m,
            None => default_bit_len(
                params.n,
                p.ok_or(Error::BloomConfig {
                    param: "p",
                    reason: "required when m is not given",
                })?,
            ),
        };
        let k = match params.k {
            Some(0) => {
                return Err(Error::BloomConfig {
                    param: "k",
                    reason: "probe count must be positive",
                });
            }
            Some(k) => k,
            None => default_hash_count(p.ok_or(Error::BloomConfig {
                param: "p",
                reason: "required when k is not given",
            })?),
        };
        Ok(Self {
            bits: vec![0u8; m.div_ceil(8) as usize],
            m,
            k,
            seed,
        })
    }

    /// Rebuild a filter from its serialized byte array plus `(m, k, s)`.
    ///
    /// # Errors
    ///
    /// Returns `Error::BloomConfig` when `m`, `k` or `s` is out of domain
    /// or `bits` does not hold exactly `ceil(m / 8)` bytes.
    pub fn from_parts(bits: Vec<u8>, m: u64, k: u32, seed: u64) -> Result<Self> {
        if m == 0 {
            return Err(Error::BloomConfig {
                param: "m",
                reason: "bit size must be positive",
            });
        }
        if k == 0 {
            return Err(Error::BloomConfig {
                param: "k",
                reason: "probe count must be positive",
            });
        }
        if seed > MAX_SEED {
            return Err(Error::BloomConfig {
                param: "s",
                reason: "seed must be at most 2^53 - 1",
            });
        }
        if bits.len() as u64 != m.div_ceil(8) {
            return Err(Error::BloomConfig {
                param: "m",
                reason: "byte array length does not match bit size",
            });
        }
        Ok(Self { bits, m, k, seed })
    }

    /// Set every hashed bit for `value`.
    pub fn add(&mut self, value: &str) {
        let (h1, h2) = self.hash_pair(value);
        for i in 0..u64::from(self.k) {
            let bit = h1.wrapping_add(i.wrapping_mul(h2)) % self.m;
            self.bits[(bit / 8) as usize] |= 1 << (7 - (bit % 8));
        }
    }

    /// Check whether every hashed bit for `value` is set.
    ///
    /// `false` means the value was definitely never added; `true` means it
    /// probably was.
    #[must_use]
    pub fn has(&self, value: &str) -> bool {
        let (h1, h2) = self.hash_pair(value);
        (0..u64::from(self.k)).all(|i| {
            let bit = h1.wrapping_add(i.wrapping_mul(h2)) % self.m;
            self.bits[(bit / 8) as usize] & (1 << (7 - (bit % 8))) != 0
        })
    }

    fn hash_pair(&self, value: &str) -> (u64, u64) {
        let bytes = value.as_bytes();
        (xxh64(bytes, self.seed), xxh64(bytes, self.seed + 1))
    }

    /// Get the raw bit array.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Render the bit array as standard base64.
    ///
    /// With the default bit size (a multiple of 24) the result carries no
    /// `=` padding.
    #[must_use]
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bits)
    }

    /// Size of the filter in bits.
    #[inline]
    #[must_use]
    pub fn bit_len(&self) -> u64 {
        self.m
    }

    /// Number of hash probes per value.
    #[inline]
    #[must_use]
    pub fn hash_count(&self) -> u32 {
        self.k
    }

    /// Hash seed.
    #[inline]
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Default bit size: `ceil(-n * ln(p) / ln(2)^2 / 24) * 24`.
fn default_bit_len(n: u64, p: f64) -> u64 {
    let ln2_sq = std::f64::consts::LN_2 * std::f64::consts::LN_2;
    let bits = -(n as f64) * p.ln() / ln2_sq;
    (bits / 24.0).ceil() as u64 * 24
}

/// Default probe count: `round(-log2(p))`, at least one probe.
fn default_hash_count(p: f64) -> u32 {
    let k = (-p.log2()).round();
    if k < 1.0 { 1 } else { k as u32 }
}
