use maxplus::{
    eigen, howard, Float, GenericMatrix, HowardOptions, LinearSystem, MaxPlus, MaxPlusMatrix,
    MinPlus, MinPlusMatrix, Result, Semiring, SemiringError, SparseMatrix, Storage, StoredMatrix,
};

const E: Float = Float::NEG_INFINITY;

#[cfg(not(feature = "float"))]
const TINY: Float = 1e-9;
#[cfg(feature = "float")]
const TINY: Float = 1e-3;

/// A flow shop with three machines. Machine `i` takes `proc[i]` units of
/// time per part, and parts travel from machine 0 to 1, and from 1 to 2.
/// Only one part at a time can be in each machine.
///
/// `x_i(k)` is the time at which machine `i` starts processing part `k`.
fn flow_shop() -> Result<LinearSystem<MaxPlus>> {
    let (p0, p1, p2) = (3., 5., 2.);
    // Same part, previous machine
    let d = MaxPlusMatrix::from_classical(3, 3, &[E, E, E, p0, E, E, E, p1, E])?;
    // Same machine, previous part
    let a = MaxPlusMatrix::from_classical(3, 3, &[p0, E, E, E, p1, E, E, E, p2])?;
    // Raw materials go into the first machine
    let b = MaxPlusMatrix::from_classical(3, 1, &[0., E, E])?;
    // Parts are done when the last machine finishes
    let c = MaxPlusMatrix::from_classical(1, 3, &[E, E, p2])?;
    LinearSystem::new(a, b, c)?.with_implicit(d)
}

#[test]
fn test_semiring_laws() {
    let values = [MaxPlus::zero(), MaxPlus::one(), MaxPlus::from(-3), MaxPlus::from(7)];
    for a in values {
        assert_eq!(a + MaxPlus::zero(), a);
        assert_eq!(a * MaxPlus::one(), a);
        assert_eq!(a * MaxPlus::zero(), MaxPlus::zero());
        for b in values {
            assert_eq!(a + b, b + a);
            assert_eq!(a * b, b * a);
            for c in values {
                assert_eq!((a + b) + c, a + (b + c));
                assert_eq!((a * b) * c, a * (b * c));
            }
        }
    }
    assert!(matches!(
        MaxPlus::try_from(Float::NAN),
        Err(SemiringError::InvalidValue { .. })
    ));
    assert!(MinPlus::try_from(Float::NEG_INFINITY).is_err());
}

#[test]
fn test_flow_shop_throughput() -> Result<()> {
    let sys = flow_shop()?;

    // Each machine only waits for the ones before it, so each one has
    // its own pace: the slowest machine upstream
    let explicit = sys.explicit()?;
    let res = explicit.a().howard(&HowardOptions::default())?;
    let pace: Vec<Float> = res.cycle_times.iter().map(|v| v.value()).collect();
    assert_eq!(pace, vec![3., 5., 5.]);
    assert!(matches!(
        explicit.a().eigen(),
        Err(SemiringError::AmbiguousSpectrum { .. })
    ));

    // All parts are available from the beginning
    let steps = 10;
    let u = MaxPlusMatrix::new(MaxPlus::one(), 1, steps);
    let y = sys.simulate(&u)?.to_classical();
    // The first part goes through the three machines; afterwards, one
    // part leaves every five units of time
    assert_eq!(y[0], 10.);
    for k in 1..steps {
        assert!((y[k] - y[k - 1] - pace[2]).abs() < TINY);
    }
    Ok(())
}

#[test]
fn test_growth_rate_is_eigenvalue() -> Result<()> {
    let a = MaxPlusMatrix::from_classical(2, 2, &[2., 5., 1., 3.])?;
    let lambda = a.eigen()?.0.value();
    assert!((lambda - 3.).abs() < TINY);

    // An autonomous system, starting from x(-1) = 0
    let sys = LinearSystem::new(
        a,
        MaxPlusMatrix::zeros(2, 1),
        MaxPlusMatrix::eye(2),
    )?
    .with_initial_state(MaxPlusMatrix::new(MaxPlus::one(), 2, 1))?;
    let y = sys.simulate(&MaxPlusMatrix::zeros(1, 6))?;
    for k in 1..6 {
        for r in 0..2 {
            let step = y.get(r, k)?.value() - y.get(r, k - 1)?.value();
            assert!((step - lambda).abs() < TINY);
        }
    }
    Ok(())
}

#[test]
fn test_storages_agree() -> Result<()> {
    let dense = MaxPlusMatrix::from_classical(
        4,
        4,
        &[
            E, 3., E, E, //
            E, E, 1., 7., //
            2., E, E, E, //
            E, -1., E, E,
        ],
    )?;
    let sparse = SparseMatrix::from_dense(&dense);
    assert_eq!(sparse.nnz(), 5);

    let from_dense = howard(&dense, &HowardOptions::default())?;
    let from_sparse = howard(&sparse, &HowardOptions::default())?;
    assert_eq!(from_dense.cycle_times, from_sparse.cycle_times);
    // cycles 0 -> 1 -> 2 -> 0 (mean 2) and 1 -> 3 -> 1 (mean 3)
    let (lambda, _) = eigen(&sparse)?;
    assert!((lambda.value() - 3.).abs() < TINY);

    let stored = StoredMatrix::from(sparse);
    let squared = stored.prod(&stored)?;
    assert_eq!(squared.storage(), Storage::Sparse);
    assert_eq!(squared.to_dense(), dense.from_prod(&dense)?);
    let mixed = stored.prod(&StoredMatrix::from(dense.clone()))?;
    assert_eq!(mixed.storage(), Storage::Dense);
    assert_eq!(mixed.to_dense(), dense.from_prod(&dense)?);
    Ok(())
}

#[test]
fn test_shortest_paths() -> Result<()> {
    let i = Float::INFINITY;
    let a = MinPlusMatrix::from_classical(
        3,
        3,
        &[
            i, 4., 1., //
            i, i, i, //
            i, 2., i,
        ],
    )?;
    let s = a.star()?;
    assert_eq!(s.get(0, 1)?, MinPlus::from(3));
    assert_eq!(s.to_classical(), vec![0., 3., 1., i, 0., i, i, 2., 0.]);
    Ok(())
}

#[test]
fn test_errors_are_distinguishable() {
    let a: GenericMatrix<MaxPlus> = MaxPlusMatrix::zeros(2, 3);
    let b = MaxPlusMatrix::zeros(2, 2);
    assert!(matches!(
        a.from_prod(&b),
        Err(SemiringError::DimensionMismatch { .. })
    ));

    let positive = MaxPlusMatrix::from_classical(1, 1, &[5.]).unwrap();
    assert!(matches!(
        positive.star(),
        Err(SemiringError::DivergentSemiring { vertex: 0 })
    ));

    let absorbing = MaxPlusMatrix::from_classical(2, 2, &[1., E, E, E]).unwrap();
    assert!(matches!(
        absorbing.eigen(),
        Err(SemiringError::UndefinedSpectrum { row: 1 })
    ));

    let reducible = MaxPlusMatrix::from_classical(2, 2, &[1., E, E, 2.]).unwrap();
    assert!(matches!(
        reducible.eigen(),
        Err(SemiringError::AmbiguousSpectrum { .. })
    ));
}

#[test]
fn test_json() -> Result<()> {
    let sys = flow_shop()?;
    let json = serde_json::to_string(&sys).unwrap();
    let back: LinearSystem<MaxPlus> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, sys);

    let options: HowardOptions =
        serde_json::from_str(r#"{"max_iterations": 5, "tolerance": 0.001}"#).unwrap();
    assert_eq!(options.iteration_bound(1000), 5);
    Ok(())
}
