use qengine::algorithms::deutsch::{self, DeutschOutcome, Oracle};
use qengine::errors::MeasurementError;
use qengine::{Measurement, Operator, QuantumRegister, Sampler};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn constant_zero_oracle_by_hand() {
    let h = Operator::hadamard();
    let hh = Operator::tensor(&h, &h).unwrap();
    let hi = Operator::tensor(&h, &Operator::i()).unwrap();
    let oracle = Operator::from_real_row_major(
        4,
        4,
        &[
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    )
    .unwrap();

    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut reg = QuantumRegister::from_bitstring(2, "01").unwrap();
        reg.apply(&hh).unwrap();
        reg.apply(&oracle).unwrap();
        reg.apply(&hi).unwrap();

        let outcome = reg.measure(&Measurement::default(), &mut rng).unwrap();
        assert_eq!(outcome / 2, 0, "seed {}", seed);
    }
}

#[test]
fn balanced_identity_oracle_by_hand() {
    let h = Operator::hadamard();
    let hh = Operator::tensor(&h, &h).unwrap();
    let hi = Operator::tensor(&h, &Operator::i()).unwrap();
    let oracle = Operator::from_real_row_major(
        4,
        4,
        &[
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, //
            0.0, 0.0, 1.0, 0.0,
        ],
    )
    .unwrap();

    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut reg = QuantumRegister::from_bitstring(2, "01").unwrap();
        reg.apply_all([&hh, &oracle, &hi]).unwrap();

        let outcome = reg.measure(&Measurement::default(), &mut rng).unwrap();
        assert_eq!(outcome / 2, 1, "seed {}", seed);
    }
}

#[test]
fn every_oracle_is_classified_correctly() {
    let m = Measurement::default();
    for seed in 0..25 {
        let mut rng = StdRng::seed_from_u64(seed);
        for oracle in Oracle::ALL {
            let verdict = deutsch::run(oracle, &m, &mut rng).unwrap();
            assert_eq!(
                verdict == DeutschOutcome::Constant,
                oracle.is_constant(),
                "{} with seed {}",
                oracle,
                seed
            );
        }
    }
}

#[test]
fn first_qubit_histogram_is_pure() {
    let mut rng = StdRng::seed_from_u64(77);
    for oracle in Oracle::ALL {
        let reg = deutsch::prepare(oracle).unwrap();
        let counts = Sampler::new().run(&reg, 500, &mut rng).unwrap();

        let high: usize = counts.iter().filter(|(i, _)| **i >= 2).map(|(_, c)| c).sum();
        let expected = if oracle.is_constant() { 0 } else { 500 };
        assert_eq!(high, expected, "{}", oracle);
    }
}

#[test]
fn zero_register_cannot_be_measured() {
    let zero = Operator::from_real_row_major(2, 2, &[0.0; 4]).unwrap();
    let mut reg = QuantumRegister::new(1).unwrap();
    reg.apply(&zero).unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        reg.measure(&Measurement::default(), &mut rng),
        Err(MeasurementError::DegenerateState)
    ));
}
