use std::io::{Error as IoError, ErrorKind};

use mta::{run, AbortReason, BitOffer, Orchestrator, ProtocolConfig, Receiver, Sender, Shares};
use mta_core::ideal::IdealMta;
use mta_fields::{FieldElement, PrimeField};
use mta_ot_core::{
    ideal::IdealOTChannel,
    rot::{RandomOTChannel, RandomOTConfig},
    OTChannel, OTError, SendHandle, TransferId,
};
use num_bigint::BigUint;
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rstest::*;

const P256: &str = "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff";
const MERSENNE_61: &str = "1fffffffffffffff";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn field(hex: &str) -> PrimeField {
    PrimeField::new(BigUint::parse_bytes(hex.as_bytes(), 16).unwrap()).unwrap()
}

fn run_with<C: OTChannel<BitOffer>>(
    field: &PrimeField,
    a: impl Into<BigUint>,
    b: impl Into<BigUint>,
    channel: &mut C,
    seed: u64,
) -> Result<Shares, AbortReason> {
    let mut rng = ChaCha12Rng::seed_from_u64(seed);

    run(
        Sender::new(field.clone(), a).unwrap(),
        Receiver::new(field.clone(), b).unwrap(),
        channel,
        &mut rng,
    )
}

/// Applies `tamper` to the pair offered at `position` before it enters the channel.
struct Tamper<C, F> {
    inner: C,
    position: usize,
    sent: usize,
    tamper: F,
}

impl<C, F> Tamper<C, F> {
    fn new(inner: C, position: usize, tamper: F) -> Self {
        Self {
            inner,
            position,
            sent: 0,
            tamper,
        }
    }
}

impl<C, F> OTChannel<BitOffer> for Tamper<C, F>
where
    C: OTChannel<BitOffer>,
    F: FnMut(&mut [BitOffer; 2]),
{
    fn send(&mut self, mut msgs: [BitOffer; 2]) -> Result<SendHandle, OTError> {
        if self.sent == self.position {
            (self.tamper)(&mut msgs);
        }
        self.sent += 1;
        self.inner.send(msgs)
    }

    fn choose(&mut self, handle: SendHandle, choice: bool) -> Result<BitOffer, OTError> {
        self.inner.choose(handle, choice)
    }
}

/// Loses the pair offered at `position`.
struct Lossy<C> {
    inner: C,
    position: usize,
    sent: usize,
}

impl<C: OTChannel<BitOffer>> OTChannel<BitOffer> for Lossy<C> {
    fn send(&mut self, msgs: [BitOffer; 2]) -> Result<SendHandle, OTError> {
        let position = self.sent;
        self.sent += 1;
        if position == self.position {
            return Ok(SendHandle::new(TransferId::new(position as u64)));
        }
        self.inner.send(msgs)
    }

    fn choose(&mut self, handle: SendHandle, choice: bool) -> Result<BitOffer, OTError> {
        self.inner.choose(handle, choice)
    }
}

/// Delivers a stale pair ahead of the one offered at `position`.
struct Reordering<C> {
    inner: C,
    position: usize,
    sent: usize,
}

impl<C: OTChannel<BitOffer>> OTChannel<BitOffer> for Reordering<C> {
    fn send(&mut self, msgs: [BitOffer; 2]) -> Result<SendHandle, OTError> {
        if self.sent == self.position {
            self.inner.send(msgs.clone())?;
        }
        self.sent += 1;
        self.inner.send(msgs)
    }

    fn choose(&mut self, handle: SendHandle, choice: bool) -> Result<BitOffer, OTError> {
        self.inner.choose(handle, choice)
    }
}

/// Fails the transport when the transfer at `position` is redeemed.
struct Disconnecting<C> {
    inner: C,
    position: usize,
    redeemed: usize,
}

impl<C: OTChannel<BitOffer>> OTChannel<BitOffer> for Disconnecting<C> {
    fn send(&mut self, msgs: [BitOffer; 2]) -> Result<SendHandle, OTError> {
        self.inner.send(msgs)
    }

    fn choose(&mut self, handle: SendHandle, choice: bool) -> Result<BitOffer, OTError> {
        if self.redeemed == self.position {
            return Err(IoError::new(ErrorKind::ConnectionReset, "peer disconnected").into());
        }
        self.redeemed += 1;
        self.inner.choose(handle, choice)
    }
}

/// Embeds `a + shift` in the value lanes of every message.
struct Shift<C> {
    inner: C,
    field: PrimeField,
    shift: FieldElement,
}

impl<C: OTChannel<BitOffer>> OTChannel<BitOffer> for Shift<C> {
    fn send(&mut self, mut msgs: [BitOffer; 2]) -> Result<SendHandle, OTError> {
        msgs[0].value = self.field.sub(&msgs[0].value, &self.shift);
        msgs[1].value = self.field.add(&msgs[1].value, &self.shift);
        self.inner.send(msgs)
    }

    fn choose(&mut self, handle: SendHandle, choice: bool) -> Result<BitOffer, OTError> {
        self.inner.choose(handle, choice)
    }
}

/// Returns an orchestrator encoding over `k` extra positions.
fn orchestrator(k: usize) -> Orchestrator {
    Orchestrator::new(
        ProtocolConfig::builder()
            .statistical_parameter(k)
            .build()
            .unwrap(),
    )
}

#[rstest]
#[case::two("2")]
#[case::three("3")]
#[case::fermat_f4("10001")]
#[case::mersenne_61(MERSENNE_61)]
#[case::p256(P256)]
fn test_mta_random_inputs(#[case] modulus: &str) {
    init_tracing();
    let field = field(modulus);
    let mut rng = ChaCha12Rng::seed_from_u64(0);

    for seed in 0..4 {
        let a = field.random_element(&mut rng);
        let b = field.random_element(&mut rng);
        let mut channel = IdealOTChannel::new(field.clone());

        let shares = run_with(&field, a.clone(), b.clone(), &mut channel, seed).unwrap();

        assert_eq!(shares.reconstruct(&field), field.mul(&a, &b));
        assert_eq!(
            channel.count(),
            field.bit_len() + ProtocolConfig::default().statistical_parameter()
        );
        assert_eq!(channel.pending(), 0);
    }
}

#[rstest]
#[case::two(2u64)]
#[case::three(3)]
#[case::five(5)]
#[case::seven(7)]
#[case::eleven(11)]
fn test_mta_exhaustive_small_fields(#[case] q: u64) {
    let field = PrimeField::new(q).unwrap();

    for a in 0..q {
        for b in 0..q {
            let mut channel = IdealOTChannel::new(field.clone());
            let shares = run_with(&field, a, b, &mut channel, a * q + b).unwrap();

            assert_eq!(shares.reconstruct(&field), field.reduce(a * b));
        }
    }
}

#[test]
fn test_mta_fermat_example() {
    init_tracing();
    let field = PrimeField::new(65537u64).unwrap();
    let mut channel = IdealOTChannel::new(field.clone());

    let shares = run_with(&field, 12345u64, 6789u64, &mut channel, 0).unwrap();

    assert_eq!(
        shares.reconstruct(&field),
        field.element(53919u64).unwrap()
    );
}

#[rstest]
#[case::zero_a(0u64, 6789u64)]
#[case::zero_b(12345, 0)]
#[case::zero_both(0, 0)]
fn test_mta_zero_input(#[case] a: u64, #[case] b: u64) {
    let field = PrimeField::new(65537u64).unwrap();
    let mut channel = IdealOTChannel::new(field.clone());

    let shares = run_with(&field, a, b, &mut channel, 0).unwrap();

    assert!(shares.reconstruct(&field).is_zero());
}

#[test]
fn test_mta_largest_inputs() {
    let field = field(P256);
    let max = field.neg(&FieldElement::one());
    let mut channel = IdealOTChannel::new(field.clone());

    let shares = run_with(&field, max.clone(), max, &mut channel, 0).unwrap();

    // (-1) * (-1) = 1
    assert_eq!(shares.reconstruct(&field), FieldElement::one());
}

#[test]
fn test_mta_independent_runs() {
    let field = field(MERSENNE_61);

    let first = run_with(
        &field,
        12345u64,
        6789u64,
        &mut IdealOTChannel::new(field.clone()),
        0,
    )
    .unwrap();
    let second = run_with(
        &field,
        12345u64,
        6789u64,
        &mut IdealOTChannel::new(field.clone()),
        1,
    )
    .unwrap();

    assert_ne!(first.alpha, second.alpha);
    assert_ne!(first.beta, second.beta);
    assert_eq!(first.reconstruct(&field), second.reconstruct(&field));
}

#[rstest]
#[case::mersenne_61(MERSENNE_61)]
#[case::p256(P256)]
fn test_mta_substituted_multiplier_rejected(#[case] modulus: &str) {
    init_tracing();
    let field = field(modulus);

    // Both messages at position 3 embed `a + 1`, so whichever is chosen is inconsistent.
    for seed in 0..8 {
        let tamper_field = field.clone();
        let mut channel = Tamper::new(
            IdealOTChannel::new(field.clone()),
            3,
            move |msgs: &mut [BitOffer; 2]| {
                let one = FieldElement::one();
                msgs[0].value = tamper_field.sub(&msgs[0].value, &one);
                msgs[1].value = tamper_field.add(&msgs[1].value, &one);
            },
        );

        assert!(matches!(
            run_with(&field, 12345u64, 6789u64, &mut channel, seed),
            Err(AbortReason::ConsistencyCheckFailed)
        ));
    }
}

#[test]
fn test_mta_check_lane_tamper_rejected() {
    let field = PrimeField::new(65537u64).unwrap();
    let tamper_field = field.clone();
    let mut channel = Tamper::new(
        IdealOTChannel::new(field.clone()),
        0,
        move |msgs: &mut [BitOffer; 2]| {
            for msg in msgs.iter_mut() {
                msg.check = tamper_field.add(&msg.check, &FieldElement::one());
            }
        },
    );

    assert!(matches!(
        run_with(&field, 12345u64, 6789u64, &mut channel, 0),
        Err(AbortReason::ConsistencyCheckFailed)
    ));
}

#[test]
fn test_mta_abort_pattern_independent_of_input() {
    let field = field(MERSENNE_61);
    let orchestrator = orchestrator(16);
    let positions = field.bit_len() + 16;
    let a = 12345u64;

    // Tampers with the `+1` message at each position in turn, recording which runs abort.
    let aborts = |b: u64| -> Vec<bool> {
        (0..positions)
            .map(|position| {
                let tamper_field = field.clone();
                let mut channel = Tamper::new(
                    IdealOTChannel::new(field.clone()),
                    position,
                    move |msgs: &mut [BitOffer; 2]| {
                        msgs[1].value = tamper_field.add(&msgs[1].value, &FieldElement::one());
                    },
                );
                let mut rng = ChaCha12Rng::seed_from_u64(position as u64);

                match orchestrator.run(
                    Sender::new(field.clone(), a).unwrap(),
                    Receiver::new(field.clone(), b).unwrap(),
                    &mut channel,
                    &mut rng,
                ) {
                    Ok(shares) => {
                        assert_eq!(shares.reconstruct(&field), field.reduce(a * b));
                        false
                    }
                    Err(AbortReason::ConsistencyCheckFailed) => true,
                    Err(err) => panic!("unexpected abort: {err}"),
                }
            })
            .collect()
    };

    let pattern = aborts(6789);

    // The pattern follows the receiver's random choices, which are the same for any input.
    assert_eq!(pattern, aborts(0));
    assert_eq!(pattern, aborts(6788));
    assert!(pattern.contains(&true));
    assert!(pattern.contains(&false));
}

#[test]
fn test_mta_tamper_at_every_position_rejected() {
    let field = field(MERSENNE_61);
    let mut channel = Shift {
        inner: IdealOTChannel::new(field.clone()),
        field: field.clone(),
        shift: field.element(7u64).unwrap(),
    };

    assert!(matches!(
        run_with(&field, 12345u64, 6789u64, &mut channel, 0),
        Err(AbortReason::ConsistencyCheckFailed)
    ));
}

#[rstest]
#[case::fermat_f4(65537u64, 12345u64, 6789u64)]
#[case::three(3, 2, 1)]
fn test_mta_matches_ideal_distribution(#[case] q: u64, #[case] a: u64, #[case] b: u64) {
    let field = PrimeField::new(q).unwrap();
    let orchestrator = orchestrator(8);
    let mut rng = ChaCha12Rng::seed_from_u64(0);
    let mut ideal = IdealMta::new();
    let runs = 600;

    // Bucket `alpha` by its residue modulo 3.
    let bucket = |alpha: &FieldElement| {
        let residue = alpha.as_biguint() % 3u8;
        residue.to_u64_digits().first().copied().unwrap_or(0) as usize
    };

    let mut real = [0usize; 3];
    let mut reference = [0usize; 3];
    for _ in 0..runs {
        let shares = orchestrator
            .run(
                Sender::new(field.clone(), a).unwrap(),
                Receiver::new(field.clone(), b).unwrap(),
                &mut IdealOTChannel::new(field.clone()),
                &mut rng,
            )
            .unwrap();
        let (alpha, beta) = ideal.generate(&field, a, b, &mut rng).unwrap();

        assert_eq!(shares.reconstruct(&field), field.add(&alpha, &beta));
        real[bucket(&shares.alpha)] += 1;
        reference[bucket(&alpha)] += 1;
    }

    assert_eq!(ideal.count(), runs);
    // Both are close to uniform, about 200 per bucket.
    for count in real.into_iter().chain(reference) {
        assert!((120..280).contains(&count), "skewed alpha: {real:?} vs {reference:?}");
    }
}

#[test]
fn test_mta_lost_transfer_aborts() {
    let field = PrimeField::new(65537u64).unwrap();
    let mut channel = Lossy {
        inner: IdealOTChannel::new(field.clone()),
        position: 5,
        sent: 0,
    };

    assert!(matches!(
        run_with(&field, 12345u64, 6789u64, &mut channel, 0),
        Err(AbortReason::Channel(OTError::UnknownTransfer(_)))
    ));
}

#[test]
fn test_mta_reordered_transfer_aborts() {
    let field = PrimeField::new(65537u64).unwrap();
    let mut channel = Reordering {
        inner: IdealOTChannel::new(field.clone()),
        position: 5,
        sent: 0,
    };

    assert!(matches!(
        run_with(&field, 12345u64, 6789u64, &mut channel, 0),
        Err(AbortReason::Channel(OTError::OutOfOrder { .. }))
    ));
}

#[test]
fn test_mta_transport_failure_aborts() {
    let field = PrimeField::new(65537u64).unwrap();
    let mut channel = Disconnecting {
        inner: IdealOTChannel::new(field.clone()),
        position: 9,
        redeemed: 0,
    };

    assert!(matches!(
        run_with(&field, 12345u64, 6789u64, &mut channel, 0),
        Err(AbortReason::Channel(OTError::Transport(_)))
    ));
}

#[test]
fn test_mta_modulus_mismatch() {
    let sender_field = PrimeField::new(65537u64).unwrap();
    let receiver_field = PrimeField::new(2_147_483_647u64).unwrap();
    let mut channel = IdealOTChannel::new(sender_field.clone());
    let mut rng = ChaCha12Rng::seed_from_u64(0);

    let result = run(
        Sender::new(sender_field, 12345u64).unwrap(),
        Receiver::new(receiver_field, 6789u64).unwrap(),
        &mut channel,
        &mut rng,
    );

    assert!(matches!(result, Err(AbortReason::ModulusMismatch { .. })));
    assert_eq!(channel.count(), 0);
}

#[rstest]
#[case::too_large(65537u64, false)]
#[case::at_limit(65521, true)]
fn test_mta_modulus_limit(#[case] q: u64, #[case] accepted: bool) {
    let field = PrimeField::new(q).unwrap();
    let orchestrator = Orchestrator::new(
        ProtocolConfig::builder()
            .max_modulus_bits(16)
            .build()
            .unwrap(),
    );
    let mut channel = IdealOTChannel::new(field.clone());
    let mut rng = ChaCha12Rng::seed_from_u64(0);

    let result = orchestrator.run(
        Sender::new(field.clone(), 3u64).unwrap(),
        Receiver::new(field.clone(), 5u64).unwrap(),
        &mut channel,
        &mut rng,
    );

    if accepted {
        assert_eq!(
            result.unwrap().reconstruct(&field),
            field.element(15u64).unwrap()
        );
    } else {
        assert!(matches!(
            result,
            Err(AbortReason::ModulusTooLarge { bits: 17, max: 16 })
        ));
        assert_eq!(channel.count(), 0);
    }
}

#[test]
fn test_invalid_inputs() {
    assert!(PrimeField::new(4u64).is_err());

    let field = PrimeField::new(3u64).unwrap();
    assert!(Sender::new(field.clone(), 5u64).is_err());
    assert!(Receiver::new(field, 3u64).is_err());
}

#[rstest]
#[case::single(1)]
#[case::small(5)]
#[case::default(128)]
fn test_mta_random_ot_channel(#[case] batch_size: usize) {
    init_tracing();
    let field = field(MERSENNE_61);
    let mut rng = ChaCha12Rng::seed_from_u64(0);
    let config = RandomOTConfig::builder()
        .batch_size(batch_size)
        .build()
        .unwrap();
    let mut channel = RandomOTChannel::from_rng(field.clone(), config, &mut rng);

    let a = field.random_element(&mut rng);
    let b = field.random_element(&mut rng);

    let shares = run(
        Sender::new(field.clone(), a.clone()).unwrap(),
        Receiver::new(field.clone(), b.clone()).unwrap(),
        &mut channel,
        &mut rng,
    )
    .unwrap();

    assert_eq!(shares.reconstruct(&field), field.mul(&a, &b));
}

#[test]
fn test_mta_random_ot_channel_tamper_rejected() {
    let field = field(P256);
    let tamper_field = field.clone();
    let mut rng = ChaCha12Rng::seed_from_u64(0);
    let inner = RandomOTChannel::from_rng(field.clone(), RandomOTConfig::default(), &mut rng);
    let mut channel = Tamper::new(inner, 0, move |msgs: &mut [BitOffer; 2]| {
        let one = FieldElement::one();
        msgs[0].value = tamper_field.sub(&msgs[0].value, &one);
        msgs[1].value = tamper_field.add(&msgs[1].value, &one);
    });

    assert!(matches!(
        run_with(&field, 12345u64, 6789u64, &mut channel, 0),
        Err(AbortReason::ConsistencyCheckFailed)
    ));
}

#[test]
fn test_mta_concurrent_runs() {
    let field = field(P256);

    let results: Vec<(FieldElement, FieldElement, Shares)> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4u64)
            .map(|seed| {
                let field = field.clone();
                scope.spawn(move || {
                    let mut rng = ChaCha12Rng::seed_from_u64(seed);
                    let a = field.random_element(&mut rng);
                    let b = field.random_element(&mut rng);
                    let mut channel = IdealOTChannel::new(field.clone());

                    let shares = run(
                        Sender::new(field.clone(), a.clone()).unwrap(),
                        Receiver::new(field.clone(), b.clone()).unwrap(),
                        &mut channel,
                        &mut rng,
                    )
                    .unwrap();

                    (a, b, shares)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    for (a, b, shares) in results {
        assert_eq!(shares.reconstruct(&field), field.mul(&a, &b));
    }
}
