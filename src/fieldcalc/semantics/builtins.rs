//! Built-in function table

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Elementwise functions of one scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarFn {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Sqrt,
    Sqr,
    Log,
    Log10,
    Exp,
    Erf,
    Erfc,
    Lgamma,
    BesselJ0,
    BesselJ1,
    BesselY0,
    BesselY1,
    Sign,
    Pos,
    Neg,
    Abs,
    Floor,
    Ceil,
    Round,
}

/// Field-to-single-value reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reduction {
    Min,
    Max,
    Sum,
    Average,
    WeightedAverage,
    SumMag,
    Size,
    MinPosition,
    MaxPosition,
}

/// Functions of one rank-2 (or, for `mag`, any numeric) argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TensorFn {
    Mag,
    MagSqr,
    Transpose,
    Tr,
    Det,
    Inv,
    Cof,
    Dev,
    Dev2,
    Symm,
    TwoSymm,
    Skew,
    Sph,
    Diag,
    EigenValues,
    EigenVectors,
}

/// Quantities read straight from the mesh collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshQuantity {
    /// `pos()`
    CellCentres,
    /// `pts()`
    PointCoordinates,
    /// `Sf()`
    FaceAreaVectors,
    /// `area()`
    FaceAreas,
    /// `normal()`
    FaceNormals,
    /// `id()`
    Index,
    /// `weight()`
    Weights,
    Time,
    DeltaT,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Scalar(ScalarFn),
    Pow,
    Atan2,
    /// Two-argument `min`/`max`, elementwise.
    ElementMin,
    ElementMax,
    Reduce(Reduction),
    Tensor(TensorFn),
    ComposeVector,
    ComposeTensor,
    ComposeSymmTensor,
    ComposeSphericalTensor,
    OldTime,
    Mapped,
    ToPoint,
    ToFace,
    Mesh(MeshQuantity),
    Rand,
    RandNormal,
}

static FIXED_ARITY: Lazy<HashMap<&'static str, (usize, Builtin)>> = Lazy::new(|| {
    use Builtin as B;
    use ScalarFn as S;
    use TensorFn as T;

    let mut table = HashMap::new();
    for (name, f) in [
        ("sin", S::Sin),
        ("cos", S::Cos),
        ("tan", S::Tan),
        ("asin", S::Asin),
        ("acos", S::Acos),
        ("atan", S::Atan),
        ("sinh", S::Sinh),
        ("cosh", S::Cosh),
        ("tanh", S::Tanh),
        ("asinh", S::Asinh),
        ("acosh", S::Acosh),
        ("atanh", S::Atanh),
        ("sqrt", S::Sqrt),
        ("sqr", S::Sqr),
        ("log", S::Log),
        ("log10", S::Log10),
        ("exp", S::Exp),
        ("erf", S::Erf),
        ("erfc", S::Erfc),
        ("lgamma", S::Lgamma),
        ("besselJ0", S::BesselJ0),
        ("besselJ1", S::BesselJ1),
        ("besselY0", S::BesselY0),
        ("besselY1", S::BesselY1),
        ("sign", S::Sign),
        ("neg", S::Neg),
        ("abs", S::Abs),
        ("floor", S::Floor),
        ("ceil", S::Ceil),
        ("round", S::Round),
    ] {
        table.insert(name, (1, B::Scalar(f)));
    }

    for (name, f) in [
        ("mag", T::Mag),
        ("magSqr", T::MagSqr),
        ("transpose", T::Transpose),
        ("tr", T::Tr),
        ("det", T::Det),
        ("inv", T::Inv),
        ("cof", T::Cof),
        ("dev", T::Dev),
        ("dev2", T::Dev2),
        ("symm", T::Symm),
        ("twoSymm", T::TwoSymm),
        ("skew", T::Skew),
        ("sph", T::Sph),
        ("diag", T::Diag),
        ("eigenValues", T::EigenValues),
        ("eigenVectors", T::EigenVectors),
    ] {
        table.insert(name, (1, B::Tensor(f)));
    }

    for (name, r) in [
        ("sum", Reduction::Sum),
        ("average", Reduction::Average),
        ("weightedAverage", Reduction::WeightedAverage),
        ("sumMag", Reduction::SumMag),
        ("size", Reduction::Size),
        ("minPosition", Reduction::MinPosition),
        ("maxPosition", Reduction::MaxPosition),
    ] {
        table.insert(name, (1, B::Reduce(r)));
    }

    for (name, q) in [
        ("pts", MeshQuantity::PointCoordinates),
        ("Sf", MeshQuantity::FaceAreaVectors),
        ("area", MeshQuantity::FaceAreas),
        ("normal", MeshQuantity::FaceNormals),
        ("id", MeshQuantity::Index),
        ("weight", MeshQuantity::Weights),
        ("time", MeshQuantity::Time),
        ("deltaT", MeshQuantity::DeltaT),
    ] {
        table.insert(name, (0, B::Mesh(q)));
    }

    table.insert("pow", (2, B::Pow));
    table.insert("atan2", (2, B::Atan2));
    table.insert("vector", (3, B::ComposeVector));
    table.insert("tensor", (9, B::ComposeTensor));
    table.insert("symmTensor", (6, B::ComposeSymmTensor));
    table.insert("sphericalTensor", (1, B::ComposeSphericalTensor));
    table.insert("oldTime", (1, B::OldTime));
    table.insert("toPoint", (1, B::ToPoint));
    table.insert("toFace", (1, B::ToFace));
    table
});

/// Names whose meaning depends on the number of arguments.
const OVERLOADED: [&str; 5] = ["pos", "min", "max", "rand", "randNormal"];

/// Resolve a call by name and argument count.
pub fn resolve(name: &str, arity: usize) -> Option<Builtin> {
    match (name, arity) {
        ("pos", 0) => Some(Builtin::Mesh(MeshQuantity::CellCentres)),
        ("pos", 1) => Some(Builtin::Scalar(ScalarFn::Pos)),
        ("min", 1) => Some(Builtin::Reduce(Reduction::Min)),
        ("max", 1) => Some(Builtin::Reduce(Reduction::Max)),
        ("min", 2) => Some(Builtin::ElementMin),
        ("max", 2) => Some(Builtin::ElementMax),
        ("rand", 0 | 1) => Some(Builtin::Rand),
        ("randNormal", 0 | 1) => Some(Builtin::RandNormal),
        ("mapped", 1 | 2) => Some(Builtin::Mapped),
        _ => FIXED_ARITY
            .get(name)
            .filter(|(expected, _)| *expected == arity)
            .map(|(_, builtin)| *builtin),
    }
}

/// True for every name the built-in table knows, at any arity.
pub fn is_builtin(name: &str) -> bool {
    name == "pi" || name == "mapped" || OVERLOADED.contains(&name) || FIXED_ARITY.contains_key(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_arity() {
        assert_eq!(
            resolve("pos", 0),
            Some(Builtin::Mesh(MeshQuantity::CellCentres))
        );
        assert_eq!(resolve("pos", 1), Some(Builtin::Scalar(ScalarFn::Pos)));
        assert_eq!(resolve("max", 1), Some(Builtin::Reduce(Reduction::Max)));
        assert_eq!(resolve("max", 2), Some(Builtin::ElementMax));
        assert_eq!(resolve("vector", 3), Some(Builtin::ComposeVector));
        assert_eq!(resolve("vector", 2), None);
        assert_eq!(resolve("mapped", 2), Some(Builtin::Mapped));
        assert_eq!(resolve("nosuch", 1), None);
    }

    #[test]
    fn test_is_builtin() {
        assert!(is_builtin("mag"));
        assert!(is_builtin("randNormal"));
        assert!(is_builtin("pi"));
        assert!(!is_builtin("rho"));
    }
}
