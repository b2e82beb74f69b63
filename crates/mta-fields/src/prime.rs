//! Primality testing for field moduli.

use num_bigint::{BigUint, RandBigInt};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Small primes used for trial division.
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Miller-Rabin with the first 13 primes as bases is deterministic below this bound.
const DETERMINISTIC_BOUND: u128 = 3_317_044_064_679_887_385_961_981;

/// Number of random bases used above [`DETERMINISTIC_BOUND`].
pub(crate) const RANDOM_ROUNDS: usize = 64;

/// Returns `true` if `n` is prime.
///
/// Moduli below [`DETERMINISTIC_BOUND`] are classified exactly. Above it, the
/// error probability is at most `4^-rounds`, and the bases are derived from `n` so that
/// the answer is the same on every call.
pub(crate) fn is_prime(n: &BigUint, rounds: usize) -> bool {
    if n.bits() <= 1 {
        // 0 and 1
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        let p = BigUint::from(p);
        if *n == p {
            return true;
        }
        if (n % &p).bits() == 0 {
            return false;
        }
    }

    let one = BigUint::from(1u8);
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or_default();
    let d = &n_minus_one >> s;

    let witness = |a: &BigUint| -> bool {
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            return true;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                return true;
            }
            if x == one {
                return false;
            }
        }
        false
    };

    if !SMALL_PRIMES[..13]
        .iter()
        .all(|&a| witness(&BigUint::from(a)))
    {
        return false;
    }

    if *n < BigUint::from(DETERMINISTIC_BOUND) {
        return true;
    }

    let mut rng = ChaCha12Rng::from_seed(bases_seed(n));
    let low = BigUint::from(2u8);
    let high = n - &one;
    (0..rounds).all(|_| witness(&rng.gen_biguint_range(&low, &high)))
}

/// Folds the little-endian bytes of `n` into a seed for the random bases.
fn bases_seed(n: &BigUint) -> [u8; 32] {
    let mut seed = [0u8; 32];
    for (i, byte) in n.to_bytes_le().into_iter().enumerate() {
        seed[i % 32] ^= byte;
    }
    seed
}
